use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Dog profile.
///
/// Only `weight_kg` feeds the energy calculation; the remaining fields are
/// informational and are stored with saved plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    pub weight_kg: f64,

    #[serde(default)]
    pub target_weight_kg: Option<f64>,

    pub age_years: f64,

    pub sex: String,

    pub neutered: bool,

    pub activity: String,
}

impl Dog {
    pub fn validate(&self) -> Result<()> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(PlannerError::invalid("weight_kg must be positive"));
        }
        if let Some(target) = self.target_weight_kg {
            if !target.is_finite() || target <= 0.0 {
                return Err(PlannerError::invalid("target_weight_kg must be positive"));
            }
        }
        if !self.age_years.is_finite() || self.age_years < 0.0 {
            return Err(PlannerError::invalid("age_years must be non-negative"));
        }
        Ok(())
    }
}
