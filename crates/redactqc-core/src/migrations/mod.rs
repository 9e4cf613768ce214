//! Schema migrations, authored with `cetane` (forward-only, one module per
//! migration). Mirrors the teacher's `foia::migrations` layout.

mod m0001_initial;

use cetane::prelude::MigrationRegistry;

pub fn registry() -> MigrationRegistry {
    let mut reg = MigrationRegistry::new();
    reg.register(m0001_initial::migration());
    reg
}

/// Run pending migrations against a SQLite file, creating it if absent.
///
/// Uses a blocking `rusqlite` connection (as the teacher does) since cetane's
/// migrator interface is synchronous; the async connection pool is opened
/// separately by `crate::store::Store::open` once this completes.
pub fn run_migrations(db_path: &std::path::Path) -> Result<(), String> {
    use cetane::backend::Sqlite;
    use cetane::migrator::{MigrationStateStore, Migrator};

    let conn = rusqlite::Connection::open(db_path).map_err(|e| e.to_string())?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .map_err(|e| e.to_string())?;

    let backend = Sqlite;
    let reg = registry();
    let state = SqliteState::new(&conn)?;

    let mut migrator = Migrator::new(&reg, &backend, state);
    let applied = migrator
        .migrate_forward(|sql| conn.execute_batch(sql).map_err(|e| e.to_string()))
        .map_err(|e| e.to_string())?;

    for name in &applied {
        tracing::info!("applied migration: {}", name);
    }
    if applied.is_empty() {
        tracing::debug!("no pending migrations");
    }

    Ok(())
}

struct SqliteState<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> SqliteState<'a> {
    fn new(conn: &'a rusqlite::Connection) -> Result<Self, String> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS __cetane_migrations (
                name TEXT PRIMARY KEY NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .map_err(|e| e.to_string())?;
        Ok(Self { conn })
    }
}

impl cetane::migrator::MigrationStateStore for SqliteState<'_> {
    fn applied_migrations(&mut self) -> Result<Vec<String>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM __cetane_migrations ORDER BY name")
            .map_err(|e| e.to_string())?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| e.to_string())?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|e| e.to_string())?;
        Ok(names)
    }

    fn mark_applied(&mut self, name: &str) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO __cetane_migrations (name) VALUES (?1)",
                [name],
            )
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn mark_unapplied(&mut self, name: &str) -> Result<(), String> {
        self.conn
            .execute("DELETE FROM __cetane_migrations WHERE name = ?1", [name])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
