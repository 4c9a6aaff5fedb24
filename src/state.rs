use std::sync::Arc;
use std::time::Duration;

use crate::remote::rest::AuthSession;
use crate::remote::RemoteSource;
use crate::resolver::ChapterResolver;
use crate::store::PositionStore;

/// Everything a reading session needs from the surrounding application.
pub struct ReaderContext {
    pub remote: Arc<dyn RemoteSource>,
    pub resolver: ChapterResolver,
    pub positions: Arc<dyn PositionStore>,
    pub viewer: Option<AuthSession>,
    pub allow_anonymous: bool,
    pub sync_quiet: Duration,
    pub controls_hide_after: Duration,
}

impl ReaderContext {
    pub fn new(remote: Arc<dyn RemoteSource>, positions: Arc<dyn PositionStore>) -> Self {
        Self {
            resolver: ChapterResolver::new(Arc::clone(&remote)),
            remote,
            positions,
            viewer: None,
            allow_anonymous: false,
            sync_quiet: Duration::from_secs(2),
            controls_hide_after: Duration::from_secs(3),
        }
    }

    pub fn with_viewer(mut self, viewer: AuthSession) -> Self {
        self.viewer = Some(viewer);
        self
    }
}
