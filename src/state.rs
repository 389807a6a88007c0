use crate::analysis::Analyzer;
use crate::session::Session;
use crate::storage::StoragePaths;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub paths: StoragePaths,
    pub session: Arc<Mutex<Session>>,
    pub analyzer: Arc<dyn Analyzer>,
    pub follow_up_delay_ms: u64,
}

impl AppState {
    pub fn new(
        paths: StoragePaths,
        session: Session,
        analyzer: Arc<dyn Analyzer>,
        follow_up_delay_ms: u64,
    ) -> Self {
        Self {
            paths,
            session: Arc::new(Mutex::new(session)),
            analyzer,
            follow_up_delay_ms,
        }
    }
}
