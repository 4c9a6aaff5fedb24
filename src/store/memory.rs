use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::store::PositionStore;

/// In-memory position store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryPositionStore {
    positions: Mutex<HashMap<(String, u32), usize>>,
}

impl MemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionStore for MemoryPositionStore {
    async fn save(&self, manga_id: &str, chapter_number: u32, page_index: usize) {
        if let Ok(mut positions) = self.positions.lock() {
            positions.insert((manga_id.to_string(), chapter_number), page_index);
        }
    }

    async fn load(&self, manga_id: &str, chapter_number: u32) -> Option<usize> {
        self.positions
            .lock()
            .ok()?
            .get(&(manga_id.to_string(), chapter_number))
            .copied()
    }
}
