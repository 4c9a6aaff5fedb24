use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MangaStatus {
    Ongoing,
    Completed,
    Hiatus,
}

impl fmt::Display for MangaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MangaStatus::Ongoing => write!(f, "ongoing"),
            MangaStatus::Completed => write!(f, "completed"),
            MangaStatus::Hiatus => write!(f, "hiatus"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// A manga record as the backend returns it. Read-only from this client's
/// point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manga {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub status: MangaStatus,
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub chapter_count: i64,
}
