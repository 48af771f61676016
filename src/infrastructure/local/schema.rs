//! Local store schema
//!
//! Mirrors the browser object store: database `iSpeaker_data`, version 1,
//! one collection `recording_data` keyed by `id`.

use rusqlite::Connection;

/// Logical database name
pub const DATABASE_NAME: &str = "iSpeaker_data";

/// Current schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: i32 = 1;

/// The single keyed collection
pub const COLLECTION: &str = "recording_data";

/// Bring a freshly opened connection up to the current schema
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    // Commits must reach disk before a put resolves
    conn.execute_batch("PRAGMA synchronous = FULL;")?;

    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version < 1 {
        conn.execute_batch(
            "BEGIN;
             CREATE TABLE IF NOT EXISTS recording_data (
                 id TEXT PRIMARY KEY NOT NULL,
                 recording BLOB NOT NULL,
                 mime_type TEXT
             );
             PRAGMA user_version = 1;
             COMMIT;",
        )?;
        log::info!("Initialized {} schema v{}", DATABASE_NAME, SCHEMA_VERSION);
    }

    Ok(())
}
