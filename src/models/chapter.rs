use serde::{Deserialize, Serialize};

use crate::models::ApprovalStatus;

/// An approved chapter. Page URLs may be stored inline or in the side
/// table, so `page_urls` being `None` or empty is a normal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub manga_id: String,
    pub chapter_number: u32,
    #[serde(default)]
    pub page_urls: Option<Vec<String>>,
    pub approval_status: ApprovalStatus,
}

/// A row of the chapter_pages side table, ordered by `page_number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRow {
    pub page_number: i64,
    pub page_url: String,
}

/// A chapter still in moderation. Its page list lives embedded in the
/// JSON `content` column rather than in the approved-side storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingChapter {
    pub id: String,
    pub manga_id: String,
    pub chapter_number: u32,
    #[serde(default)]
    pub content: PendingContent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingContent {
    #[serde(default)]
    pub pages: Vec<String>,
}

/// One element of the merged navigation list covering both the approved
/// and the pending set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChapterSummary {
    pub id: String,
    pub chapter_number: u32,
    #[serde(default)]
    pub pending: bool,
}
