use std::fmt;

/// A client-side reading location: `/read/{slug}/{chapter}[?page=N]`.
///
/// The chapter segment is kept raw here; the resolver validates it so a
/// non-numeric value fails with the proper typed condition rather than at
/// parse time. An unparseable `page` value is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRoute {
    pub slug: String,
    pub chapter: String,
    pub page: Option<u32>,
}

impl ReadRoute {
    pub fn new(slug: &str, chapter: &str, page: Option<u32>) -> Self {
        Self {
            slug: slug.to_string(),
            chapter: chapter.to_string(),
            page,
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let input = input.strip_prefix('/').unwrap_or(input);
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (input, None),
        };

        let mut segments = path.split('/');
        if segments.next() != Some("read") {
            return None;
        }
        let slug = segments.next()?;
        let chapter = segments.next()?;
        if slug.is_empty() || chapter.is_empty() || segments.next().is_some() {
            return None;
        }

        let page = query.and_then(|query| {
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("page="))
                .and_then(|value| value.parse().ok())
        });

        Some(Self::new(slug, chapter, page))
    }
}

impl fmt::Display for ReadRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/read/{}/{}", self.slug, self.chapter)?;
        if let Some(page) = self.page {
            write!(f, "?page={}", page)?;
        }
        Ok(())
    }
}
