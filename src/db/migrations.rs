use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Migrations compiled into the binary, used when no migrations directory
/// is available next to the executable.
const EMBEDDED: &[(&str, &str)] = &[(
    "001_initial.sql",
    include_str!("../../migrations/001_initial.sql"),
)];

struct Migration {
    name: String,
    sql: String,
}

fn load_migrations(migrations_dir: &Path) -> rusqlite::Result<Vec<Migration>> {
    let mut entries: Vec<_> = fs::read_dir(migrations_dir)
        .map(|rd| {
            rd.filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "sql"))
                .collect()
        })
        .unwrap_or_default();

    if entries.is_empty() {
        tracing::debug!(
            dir = %migrations_dir.display(),
            "No migration files found, using embedded migrations"
        );
        return Ok(EMBEDDED
            .iter()
            .map(|(name, sql)| Migration {
                name: name.to_string(),
                sql: sql.to_string(),
            })
            .collect());
    }

    entries.sort_by_key(|e| e.file_name());
    entries
        .into_iter()
        .map(|entry| {
            let sql = fs::read_to_string(entry.path())
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Ok(Migration {
                name: entry.file_name().to_string_lossy().into_owned(),
                sql,
            })
        })
        .collect()
}

pub fn run_migrations(conn: &Connection, migrations_dir: &Path) -> rusqlite::Result<()> {
    tracing::debug!(dir = %migrations_dir.display(), "Checking for database migrations");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let migrations = load_migrations(migrations_dir)?;
    tracing::debug!(count = migrations.len(), "Found migrations");

    let mut applied_count = 0;
    for migration in migrations {
        let already_applied: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM _migrations WHERE name = ?)",
            [&migration.name],
            |row| row.get(0),
        )?;
        if already_applied {
            continue;
        }

        tracing::info!(migration = %migration.name, "Applying migration");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(&migration.sql)?;
        tx.execute("INSERT INTO _migrations (name) VALUES (?)", [&migration.name])?;
        tx.commit()?;
        applied_count += 1;
    }

    if applied_count > 0 {
        tracing::info!(count = applied_count, "Migrations applied successfully");
    } else {
        tracing::debug!("No new migrations to apply");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_embedded_migrations_used_without_directory() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn, Path::new("does-not-exist")).unwrap();
        assert!(table_exists(&conn, "transactions"));
        assert!(table_exists(&conn, "budgets"));
    }

    #[test]
    fn test_migrations_are_applied_once() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn, Path::new("migrations")).unwrap();
        run_migrations(&conn, Path::new("migrations")).unwrap();
        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, EMBEDDED.len() as i64);
    }
}
