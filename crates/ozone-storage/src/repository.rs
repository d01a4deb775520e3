//! Storage seams for per-device history and saved tips.

use uuid::Uuid;

use ozone_core::error::Result;
use ozone_core::types::{EmissionsResult, HistoryEntry, Tip};

/// Calculation history, one ordered list per device.
pub trait HistoryRepository: Send + Sync {
    /// Entries in insertion order, oldest first.
    fn load(&self, device: &str) -> Result<Vec<HistoryEntry>>;

    /// Store a result under a fresh id and return the stored entry.
    fn append(&self, device: &str, result: &EmissionsResult) -> Result<HistoryEntry>;

    fn get(&self, device: &str, id: Uuid) -> Result<Option<HistoryEntry>>;

    /// Returns false when the device has no entry with that id.
    fn remove(&self, device: &str, id: Uuid) -> Result<bool>;
}

/// Saved seasonal tips, one ordered set per device.
pub trait TipPlanRepository: Send + Sync {
    fn load(&self, device: &str) -> Result<Vec<Tip>>;

    /// Returns false when a tip with the same id is already saved.
    fn add(&self, device: &str, tip: &Tip) -> Result<bool>;

    fn remove(&self, device: &str, tip_id: &str) -> Result<bool>;
}
