// Application state
// Owned shared state injected into every handler

use tokio::sync::RwLock;

use super::types::Config;
use crate::store::MovieStore;

/// Application state shared by all request tasks.
pub struct AppState {
    pub config: Config,
    /// The authoritative movie collection. This lock is the single
    /// mutual-exclusion boundary for all store operations: reads take
    /// the read lock, mutations the write lock.
    pub store: RwLock<MovieStore>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            store: RwLock::new(MovieStore::new()),
        }
    }
}
