use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

/// Process-wide storage handle. Built once at startup and shared through
/// `AppState`; connections are checked out per request.
pub type DbPool = Pool<SqliteConnectionManager>;

const PRAGMAS: &str = "PRAGMA journal_mode = WAL;
     PRAGMA synchronous = NORMAL;
     PRAGMA foreign_keys = ON;
     PRAGMA busy_timeout = 5000;";

pub fn create_pool(database_path: &Path) -> Result<DbPool, r2d2::Error> {
    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let manager =
        SqliteConnectionManager::file(database_path).with_init(|conn| conn.execute_batch(PRAGMAS));

    Pool::builder().max_size(10).build(manager)
}

/// A single-connection pool over a private in-memory database.
///
/// Every SQLite `:memory:` connection is its own database, so the pool must
/// never hand out a second one.
pub fn create_in_memory_pool() -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    Pool::builder().max_size(1).build(manager)
}
