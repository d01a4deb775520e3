//! Seasonal sustainability tips and the saved-tip plan.

pub mod catalog;
pub mod error;
pub mod plan;
pub mod season;

pub use catalog::{find_tip, tips_for_month, tips_for_season};
pub use error::SeasonalError;
pub use plan::TipPlan;
pub use season::{current_month, month_name, Season};
