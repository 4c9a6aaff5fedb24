use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{Bookmark, Chapter, ChapterSummary, Manga, PageRow, PendingChapter};
use crate::remote::http_client::create_client;
use crate::remote::{RemoteError, RemoteResult, RemoteSource};

/// An authenticated viewer, as returned by the backend's token endpoint.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: String,
    pub access_token: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
}

/// Client of the backend's REST query surface. Filters use the
/// `column=eq.value` form; the service key goes in `apikey` and the
/// viewer's token, when present, in the bearer header.
pub struct RestSource {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestSource {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: create_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: None,
        }
    }

    pub fn with_token(mut self, access_token: &str) -> Self {
        self.access_token = Some(access_token.to_string());
        self
    }

    /// Password-grant sign-in against the backend's auth endpoint.
    pub async fn sign_in(&self, email: &str, password: &str) -> RemoteResult<AuthSession> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        if response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNAUTHORIZED
        {
            return Err(RemoteError::Unauthorized(
                "Invalid credentials".to_string(),
            ));
        }

        let token = response
            .error_for_status()
            .map_err(|e| RemoteError::Http(e.to_string()))?
            .json::<TokenResponse>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(AuthSession {
            user_id: token.user.id,
            access_token: token.access_token,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("apikey", &self.api_key);
        match &self.access_token {
            Some(token) => request.header("authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, path_and_query: &str) -> RemoteResult<Vec<T>> {
        let url = format!("{}/rest/v1/{}", self.base_url, path_and_query);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(RemoteError::Unauthorized(url));
        }

        response
            .error_for_status()
            .map_err(|e| RemoteError::Http(e.to_string()))?
            .json::<Vec<T>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> RemoteResult<Option<T>> {
        let rows = self.fetch_rows::<T>(path_and_query).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl RemoteSource for RestSource {
    async fn list_manga(&self) -> RemoteResult<Vec<Manga>> {
        self.fetch_rows("manga?approval_status=eq.approved&select=*&order=title.asc")
            .await
    }

    async fn manga_by_slug(&self, slug: &str) -> RemoteResult<Option<Manga>> {
        self.fetch_one(&format!("manga?slug=eq.{}&select=*&limit=1", slug))
            .await
    }

    async fn approved_chapter(
        &self,
        manga_id: &str,
        chapter_number: u32,
    ) -> RemoteResult<Option<Chapter>> {
        self.fetch_one(&format!(
            "chapters?manga_id=eq.{}&chapter_number=eq.{}&approval_status=eq.approved&select=*&limit=1",
            manga_id, chapter_number
        ))
        .await
    }

    async fn chapter_pages(&self, chapter_id: &str) -> RemoteResult<Vec<PageRow>> {
        self.fetch_rows(&format!(
            "chapter_pages?chapter_id=eq.{}&select=page_number,page_url&order=page_number.asc",
            chapter_id
        ))
        .await
    }

    async fn pending_chapter(
        &self,
        manga_id: &str,
        chapter_number: u32,
    ) -> RemoteResult<Option<PendingChapter>> {
        self.fetch_one(&format!(
            "pending_chapters?manga_id=eq.{}&chapter_number=eq.{}&status=eq.pending&select=*&limit=1",
            manga_id, chapter_number
        ))
        .await
    }

    async fn approved_chapters(&self, manga_id: &str) -> RemoteResult<Vec<ChapterSummary>> {
        self.fetch_rows(&format!(
            "chapters?manga_id=eq.{}&approval_status=eq.approved&select=id,chapter_number&order=chapter_number.asc",
            manga_id
        ))
        .await
    }

    async fn pending_chapters(&self, manga_id: &str) -> RemoteResult<Vec<ChapterSummary>> {
        let mut summaries: Vec<ChapterSummary> = self
            .fetch_rows(&format!(
                "pending_chapters?manga_id=eq.{}&status=eq.pending&select=id,chapter_number&order=chapter_number.asc",
                manga_id
            ))
            .await?;

        for summary in &mut summaries {
            summary.pending = true;
        }

        Ok(summaries)
    }

    async fn bookmark(&self, user_id: &str, manga_id: &str) -> RemoteResult<Option<Bookmark>> {
        self.fetch_one(&format!(
            "bookmarks?user_id=eq.{}&manga_id=eq.{}&select=*&limit=1",
            user_id, manga_id
        ))
        .await
    }

    async fn upsert_bookmark(&self, bookmark: &Bookmark) -> RemoteResult<()> {
        let url = format!(
            "{}/rest/v1/bookmarks?on_conflict=user_id,manga_id",
            self.base_url
        );

        let response = self
            .authorize(self.client.post(&url))
            .header("prefer", "resolution=merge-duplicates")
            .json(bookmark)
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(RemoteError::Unauthorized(url));
        }

        response
            .error_for_status()
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        Ok(())
    }
}
