//! The `ozone.db` file holding saved history and tip plans.
//!
//! The CLI and a running `ozone serve` may open the same file at once, so
//! the connection waits on a locked database instead of failing outright.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::Connection;
use tracing::info;

use ozone_core::error::OzoneError;

use crate::migrations;

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "ozone.db";

/// How long a writer waits for another process holding the file lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn storage_err(context: &str, err: rusqlite::Error) -> OzoneError {
    OzoneError::Storage(format!("{}: {}", context, err))
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open `ozone.db` inside `data_dir`, creating the directory if needed.
    pub fn open_in(data_dir: &Path) -> Result<Self, OzoneError> {
        Self::open(&data_dir.join(DB_FILE_NAME))
    }

    /// Open (or create) a database file, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, OzoneError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| storage_err(&format!("cannot open history store {}", path.display()), e))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| storage_err("cannot enable WAL journal", e))?;

        let db = Self::prepare(conn)?;
        info!(path = %path.display(), "History store ready");
        Ok(db)
    }

    /// Open a throwaway in-memory database.
    pub fn in_memory() -> Result<Self, OzoneError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| storage_err("cannot open in-memory history store", e))?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self, OzoneError> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| storage_err("cannot set busy timeout", e))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| storage_err("cannot set synchronous mode", e))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;
        Ok(db)
    }

    /// Run a closure while holding the connection lock.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, OzoneError>
    where
        F: FnOnce(&Connection) -> Result<T, OzoneError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| OzoneError::Storage("history store lock poisoned".to_string()))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
