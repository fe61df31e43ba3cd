use crate::config::Config;
use crate::db::DbPool;
use std::sync::Arc;

/// Shared request state. The pool is created once by `server::build_app`
/// and lives for the whole process.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
