//! Schema migrations, tracked in `schema_migrations`.

use rusqlite::Connection;
use tracing::info;

use ozone_core::error::OzoneError;

pub fn run_migrations(conn: &Connection) -> Result<(), OzoneError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| OzoneError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| OzoneError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: calculation history and saved tips, both keyed by device.
fn apply_v1(conn: &Connection) -> Result<(), OzoneError> {
    conn.execute_batch(
        "
        -- seq keeps insertion order independent of the entry timestamps.
        CREATE TABLE IF NOT EXISTS history (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            id          TEXT NOT NULL UNIQUE,
            device_id   TEXT NOT NULL,
            result_json TEXT NOT NULL,
            created_at  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_device
            ON history (device_id, seq ASC);

        CREATE TABLE IF NOT EXISTS saved_tips (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            device_id   TEXT NOT NULL,
            tip_id      TEXT NOT NULL,
            tip_json    TEXT NOT NULL,
            saved_at    INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            UNIQUE (device_id, tip_id)
        );

        INSERT INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| OzoneError::Storage(format!("Migration v1 failed: {}", e)))?;

    Ok(())
}
