//! Schema migrations, tracked in SQLite's `user_version` pragma

use crate::Result;
use rusqlite::Connection;

pub(crate) const SCHEMA_VERSION: i32 = 2;

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    let version = schema_version(conn)?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tracing::info!(from = version, to = SCHEMA_VERSION, "Navigation schema migrated");
    Ok(())
}

pub(crate) fn schema_version(conn: &Connection) -> Result<i32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// One row per restoration key; the document is the serialized scene tree
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            restoration_key TEXT PRIMARY KEY,
            document TEXT NOT NULL,
            scene_count INTEGER NOT NULL DEFAULT 0,
            saved_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_snapshots_saved ON snapshots(saved_at);
    "#,
    )?;
    Ok(())
}

/// Key-value settings, e.g. persisted configuration overrides
fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    )?;
    Ok(())
}
