use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::error::{PlannerError, Result};
use crate::models::Dog;
use crate::planner::constants::*;

/// Resting and maintenance energy for one dog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyCalories {
    pub rer: f64,
    pub mer: f64,
}

/// Resting Energy Requirement: `70 * weight_kg^0.75`.
///
/// Weight must be positive and finite.
pub fn compute_rer(weight_kg: f64) -> Result<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(PlannerError::invalid(format!(
            "weight_kg must be positive (got {})",
            weight_kg
        )));
    }
    Ok(RER_MULTIPLIER * weight_kg.powf(RER_EXPONENT))
}

/// Maintenance Energy Requirement: RER scaled by a life-stage factor.
#[inline]
pub fn compute_mer(rer: f64, factor: f64) -> f64 {
    rer * factor
}

/// Compute RER and MER for a dog.
pub fn compute_daily_calories(dog: &Dog, mer_factor: f64) -> Result<DailyCalories> {
    let rer = compute_rer(dog.weight_kg)?;
    let mer = compute_mer(rer, mer_factor);
    Ok(DailyCalories { rer, mer })
}

/// Grams of a food needed to supply `desired_kcal`.
///
/// Fails when the energy density is not positive.
pub fn calories_to_grams(desired_kcal: f64, kcal_per_100g: f64) -> Result<f64> {
    if kcal_per_100g <= 0.0 || kcal_per_100g.is_nan() {
        return Err(PlannerError::invalid("kcal_per_100g must be positive"));
    }
    Ok((desired_kcal / kcal_per_100g) * GRAMS_BASIS)
}

/// Energy supplied by `grams` of a food.
///
/// Fails when grams is negative.
pub fn grams_to_calories(grams: f64, kcal_per_100g: f64) -> Result<f64> {
    if grams < 0.0 || grams.is_nan() {
        return Err(PlannerError::invalid("grams must be non-negative"));
    }
    Ok((grams / GRAMS_BASIS) * kcal_per_100g)
}

/// Look up a MER factor by key.
///
/// Unknown keys are rejected, with the closest known key suggested when one
/// is similar enough.
pub fn mer_factor(key: &str) -> Result<f64> {
    if let Some(factor) = MER_FACTORS.get(key) {
        return Ok(*factor);
    }

    let needle = key.trim().to_lowercase();
    let suggestion = MER_FACTOR_KEYS
        .iter()
        .map(|candidate| (*candidate, jaro_winkler(candidate, &needle)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(candidate, _)| candidate.to_string());

    Err(PlannerError::UnknownMerFactor {
        key: key.to_string(),
        suggestion,
    })
}
