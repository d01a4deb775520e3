//! SQLite-backed repositories. Results and tips are stored as JSON.

use std::sync::Arc;

use rusqlite::OptionalExtension;
use uuid::Uuid;

use ozone_core::error::{OzoneError, Result};
use ozone_core::types::{EmissionsResult, HistoryEntry, Tip};

use crate::db::Database;
use crate::repository::{HistoryRepository, TipPlanRepository};

pub struct SqliteHistoryRepository {
    db: Arc<Database>,
}

impl SqliteHistoryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn row_to_entry(id: String, json: String) -> Result<HistoryEntry> {
    let id = Uuid::parse_str(&id)
        .map_err(|e| OzoneError::Storage(format!("Invalid history id '{}': {}", id, e)))?;
    let result: EmissionsResult = serde_json::from_str(&json)?;
    Ok(HistoryEntry { id, result })
}

impl HistoryRepository for SqliteHistoryRepository {
    fn load(&self, device: &str) -> Result<Vec<HistoryEntry>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, result_json FROM history
                     WHERE device_id = ?1 ORDER BY seq ASC",
                )
                .map_err(|e| OzoneError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![device], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|e| OzoneError::Storage(e.to_string()))?;

            let mut entries = Vec::new();
            for row in rows {
                let (id, json) = row.map_err(|e| OzoneError::Storage(e.to_string()))?;
                entries.push(row_to_entry(id, json)?);
            }
            Ok(entries)
        })
    }

    fn append(&self, device: &str, result: &EmissionsResult) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            result: result.clone(),
        };
        let json = serde_json::to_string(&entry.result)?;

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO history (id, device_id, result_json, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    entry.id.to_string(),
                    device,
                    json,
                    entry.result.timestamp.timestamp(),
                ],
            )
            .map_err(|e| OzoneError::Storage(format!("Failed to save history entry: {}", e)))?;
            Ok(())
        })?;

        Ok(entry)
    }

    fn get(&self, device: &str, id: Uuid) -> Result<Option<HistoryEntry>> {
        let row = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, result_json FROM history WHERE device_id = ?1 AND id = ?2",
                rusqlite::params![device, id.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(|e| OzoneError::Storage(e.to_string()))
        })?;

        row.map(|(id, json)| row_to_entry(id, json)).transpose()
    }

    fn remove(&self, device: &str, id: Uuid) -> Result<bool> {
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    "DELETE FROM history WHERE device_id = ?1 AND id = ?2",
                    rusqlite::params![device, id.to_string()],
                )
                .map_err(|e| {
                    OzoneError::Storage(format!("Failed to delete history entry: {}", e))
                })?;
            Ok(changed > 0)
        })
    }
}

pub struct SqliteTipPlanRepository {
    db: Arc<Database>,
}

impl SqliteTipPlanRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl TipPlanRepository for SqliteTipPlanRepository {
    fn load(&self, device: &str) -> Result<Vec<Tip>> {
        let rows = self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT tip_json FROM saved_tips WHERE device_id = ?1 ORDER BY seq ASC")
                .map_err(|e| OzoneError::Storage(e.to_string()))?;
            let rows = stmt
                .query_map(rusqlite::params![device], |row| row.get::<_, String>(0))
                .map_err(|e| OzoneError::Storage(e.to_string()))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| OzoneError::Storage(e.to_string()))?;
            Ok(rows)
        })?;

        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(OzoneError::from))
            .collect()
    }

    fn add(&self, device: &str, tip: &Tip) -> Result<bool> {
        let json = serde_json::to_string(tip)?;
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    "INSERT OR IGNORE INTO saved_tips (device_id, tip_id, tip_json)
                     VALUES (?1, ?2, ?3)",
                    rusqlite::params![device, tip.id, json],
                )
                .map_err(|e| OzoneError::Storage(format!("Failed to save tip: {}", e)))?;
            Ok(changed > 0)
        })
    }

    fn remove(&self, device: &str, tip_id: &str) -> Result<bool> {
        self.db.with_conn(|conn| {
            let changed = conn
                .execute(
                    "DELETE FROM saved_tips WHERE device_id = ?1 AND tip_id = ?2",
                    rusqlite::params![device, tip_id],
                )
                .map_err(|e| OzoneError::Storage(format!("Failed to remove tip: {}", e)))?;
            Ok(changed > 0)
        })
    }
}
