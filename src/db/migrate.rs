use crate::errors::AppResult;
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Add the index used by `log --print --operation`.
fn migrate_add_operation_index(conn: &Connection) -> Result<bool> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='index' AND name='idx_log_operation'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    if existing.is_some() {
        return Ok(false);
    }

    conn.execute_batch("CREATE INDEX idx_log_operation ON log(operation);")?;
    Ok(true)
}

/// Apply every pending schema step. Safe to call on each start.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    if migrate_add_operation_index(conn)? {
        success("Migration applied: added idx_log_operation to log table.");
        crate::db::log::ttlog(
            conn,
            "migration_applied",
            "idx_log_operation",
            "Index on log(operation) created",
        )?;
    }

    Ok(())
}
