//! Mutex-protected in-memory repositories.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use ozone_core::error::{OzoneError, Result};
use ozone_core::types::{EmissionsResult, HistoryEntry, Tip};

use crate::repository::{HistoryRepository, TipPlanRepository};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|e| OzoneError::Storage(format!("Store lock poisoned: {}", e)))
}

#[derive(Debug, Default)]
pub struct InMemoryHistoryRepository {
    entries: Mutex<HashMap<String, Vec<HistoryEntry>>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryRepository for InMemoryHistoryRepository {
    fn load(&self, device: &str) -> Result<Vec<HistoryEntry>> {
        Ok(lock(&self.entries)?.get(device).cloned().unwrap_or_default())
    }

    fn append(&self, device: &str, result: &EmissionsResult) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            result: result.clone(),
        };
        lock(&self.entries)?
            .entry(device.to_string())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    fn get(&self, device: &str, id: Uuid) -> Result<Option<HistoryEntry>> {
        Ok(lock(&self.entries)?
            .get(device)
            .and_then(|list| list.iter().find(|e| e.id == id).cloned()))
    }

    fn remove(&self, device: &str, id: Uuid) -> Result<bool> {
        let mut entries = lock(&self.entries)?;
        let Some(list) = entries.get_mut(device) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|e| e.id != id);
        Ok(list.len() != before)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTipPlanRepository {
    tips: Mutex<HashMap<String, Vec<Tip>>>,
}

impl InMemoryTipPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TipPlanRepository for InMemoryTipPlanRepository {
    fn load(&self, device: &str) -> Result<Vec<Tip>> {
        Ok(lock(&self.tips)?.get(device).cloned().unwrap_or_default())
    }

    fn add(&self, device: &str, tip: &Tip) -> Result<bool> {
        let mut tips = lock(&self.tips)?;
        let list = tips.entry(device.to_string()).or_default();
        if list.iter().any(|t| t.id == tip.id) {
            return Ok(false);
        }
        list.push(tip.clone());
        Ok(true)
    }

    fn remove(&self, device: &str, tip_id: &str) -> Result<bool> {
        let mut tips = lock(&self.tips)?;
        let Some(list) = tips.get_mut(device) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|t| t.id != tip_id);
        Ok(list.len() != before)
    }
}
