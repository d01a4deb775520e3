//! Ozone Storage crate - per-device calculation history and saved tips.
//!
//! Repository traits with in-memory and SQLite (WAL mode, versioned
//! migrations) implementations.

pub mod db;
pub mod memory;
pub mod migrations;
pub mod repository;
pub mod sqlite;

pub use db::{Database, DB_FILE_NAME};
pub use memory::{InMemoryHistoryRepository, InMemoryTipPlanRepository};
pub use repository::{HistoryRepository, TipPlanRepository};
pub use sqlite::{SqliteHistoryRepository, SqliteTipPlanRepository};
