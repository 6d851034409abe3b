use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Nutrients;

/// A computed daily meal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    /// Daily energy target (MER).
    pub target_kcal: f64,

    /// Energy supplied by the kibble portion.
    pub kibble_kcal: f64,

    /// Energy supplied by treats.
    pub treats_kcal: f64,

    /// Energy left for homemade food after kibble and treats; never negative.
    pub homemade_kcal_budget: f64,

    /// Kibble + treats + recipe energy.
    pub total_kcal: f64,

    pub nutrients_total: Nutrients,

    pub nutrients_per_1000_kcal: Nutrients,

    /// Nutrient field name to warning message, for minimums not met.
    pub aafco_warnings: BTreeMap<String, String>,

    /// Meal name to grams of recipe served at that meal.
    pub per_meal_grams: BTreeMap<String, f64>,
}

impl MealPlan {
    pub fn has_warnings(&self) -> bool {
        !self.aafco_warnings.is_empty()
    }
}
