use async_trait::async_trait;

use crate::models::{Chapter, PendingChapter};
use crate::remote::{RemoteResult, RemoteSource};

/// A chapter record as found in one of the two disjoint read-time sets.
#[derive(Debug, Clone)]
pub enum ChapterRecord {
    Approved(Chapter),
    Pending(PendingChapter),
}

impl ChapterRecord {
    pub fn id(&self) -> &str {
        match self {
            ChapterRecord::Approved(chapter) => &chapter.id,
            ChapterRecord::Pending(chapter) => &chapter.id,
        }
    }

    pub fn chapter_number(&self) -> u32 {
        match self {
            ChapterRecord::Approved(chapter) => chapter.chapter_number,
            ChapterRecord::Pending(chapter) => chapter.chapter_number,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ChapterRecord::Pending(_))
    }
}

/// One way of materializing a chapter's ordered page list.
///
/// Sources are tried in a fixed order; answering `None` means "not
/// applicable here" and passes the record to the next source. A chapter
/// no source answers for has no pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn page_list(
        &self,
        remote: &dyn RemoteSource,
        record: &ChapterRecord,
    ) -> RemoteResult<Option<Vec<String>>>;
}

/// Approved chapters storing their page URLs inline on the record.
pub struct InlineUrlSource;

#[async_trait]
impl PageSource for InlineUrlSource {
    fn name(&self) -> &'static str {
        "inline_urls"
    }

    async fn page_list(
        &self,
        _remote: &dyn RemoteSource,
        record: &ChapterRecord,
    ) -> RemoteResult<Option<Vec<String>>> {
        match record {
            ChapterRecord::Approved(chapter) => match &chapter.page_urls {
                Some(urls) if !urls.is_empty() => Ok(Some(urls.clone())),
                _ => Ok(None),
            },
            ChapterRecord::Pending(_) => Ok(None),
        }
    }
}

/// Approved chapters whose pages live in the side table, ordered by
/// page_number.
pub struct PageTableSource;

#[async_trait]
impl PageSource for PageTableSource {
    fn name(&self) -> &'static str {
        "page_table"
    }

    async fn page_list(
        &self,
        remote: &dyn RemoteSource,
        record: &ChapterRecord,
    ) -> RemoteResult<Option<Vec<String>>> {
        match record {
            ChapterRecord::Approved(chapter) => {
                let rows = remote.chapter_pages(&chapter.id).await?;
                if rows.is_empty() {
                    return Ok(None);
                }
                Ok(Some(rows.into_iter().map(|row| row.page_url).collect()))
            }
            ChapterRecord::Pending(_) => Ok(None),
        }
    }
}

/// Pending chapters carry their page list embedded in the JSON content.
pub struct PendingContentSource;

#[async_trait]
impl PageSource for PendingContentSource {
    fn name(&self) -> &'static str {
        "pending_content"
    }

    async fn page_list(
        &self,
        _remote: &dyn RemoteSource,
        record: &ChapterRecord,
    ) -> RemoteResult<Option<Vec<String>>> {
        match record {
            ChapterRecord::Pending(chapter) if !chapter.content.pages.is_empty() => {
                Ok(Some(chapter.content.pages.clone()))
            }
            _ => Ok(None),
        }
    }
}

pub fn default_chain() -> Vec<Box<dyn PageSource>> {
    vec![
        Box::new(InlineUrlSource),
        Box::new(PageTableSource),
        Box::new(PendingContentSource),
    ]
}
