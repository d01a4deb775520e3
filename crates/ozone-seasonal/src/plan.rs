//! Saved-tip plan per device.

use std::sync::Arc;

use tracing::debug;

use ozone_core::types::Tip;
use ozone_storage::TipPlanRepository;

use crate::catalog::find_tip;
use crate::error::SeasonalError;

pub struct TipPlan {
    repo: Arc<dyn TipPlanRepository>,
}

impl TipPlan {
    pub fn new(repo: Arc<dyn TipPlanRepository>) -> Self {
        Self { repo }
    }

    pub fn list(&self, device: &str) -> Result<Vec<Tip>, SeasonalError> {
        Ok(self.repo.load(device)?)
    }

    /// Save a catalog tip. Returns false when it was already saved.
    pub fn add(&self, device: &str, tip_id: &str) -> Result<bool, SeasonalError> {
        let tip = find_tip(tip_id).ok_or_else(|| SeasonalError::UnknownTip(tip_id.to_string()))?;
        let added = self.repo.add(device, &tip)?;
        debug!(device, tip_id, added, "Tip plan add");
        Ok(added)
    }

    pub fn remove(&self, device: &str, tip_id: &str) -> Result<bool, SeasonalError> {
        Ok(self.repo.remove(device, tip_id)?)
    }
}
