use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::models::{Dog, Ingredient, MealPlan, Nutrients, Recipe};
use crate::planner::calculations::{compute_daily_calories, grams_to_calories};
use crate::planner::constants::{DEFAULT_MEALS, KCAL_BASIS};
use crate::standards::StandardsTable;

/// Everything the calculator needs to build one plan.
#[derive(Debug, Clone)]
pub struct PlanInputs {
    pub dog: Dog,
    pub mer_factor: f64,
    pub kibble: Ingredient,
    pub kibble_grams: f64,
    pub treats_kcal: f64,
    pub recipe: Recipe,
    pub meals: Vec<String>,
}

impl PlanInputs {
    /// Default meal schedule (breakfast and dinner).
    pub fn default_meals() -> Vec<String> {
        DEFAULT_MEALS.iter().map(|m| m.to_string()).collect()
    }
}

/// Re-express nutrients per 1000 kcal.
///
/// A non-positive energy total yields the zero vector. Otherwise the energy
/// field of the result is exactly 1000.
pub fn normalize_per_1000_kcal(nutrients: &Nutrients) -> Nutrients {
    if nutrients.kcal <= 0.0 {
        return Nutrients::ZERO;
    }
    let scale = KCAL_BASIS / nutrients.kcal;
    nutrients.scaled(scale).with_kcal(KCAL_BASIS)
}

/// Split the recipe's grams evenly across the named meals.
///
/// An empty meal list yields an empty map. Repeated names share one entry
/// but still count toward the divisor.
pub fn split_recipe_by_meals(recipe: &Recipe, meals: &[String]) -> BTreeMap<String, f64> {
    if meals.is_empty() {
        return BTreeMap::new();
    }
    let per_meal = recipe.total_grams() / meals.len() as f64;
    meals.iter().map(|meal| (meal.clone(), per_meal)).collect()
}

/// Build a complete meal plan.
///
/// Fails without a partial result if the dog's weight, the kibble grams or
/// any recipe item's grams are invalid.
pub fn compute_meal_plan(inputs: &PlanInputs, standards: &StandardsTable) -> Result<MealPlan> {
    let daily = compute_daily_calories(&inputs.dog, inputs.mer_factor)?;
    debug!(
        weight_kg = inputs.dog.weight_kg,
        rer = daily.rer,
        mer = daily.mer,
        "Daily energy requirement"
    );
    let kibble_kcal = grams_to_calories(inputs.kibble_grams, inputs.kibble.kcal_per_100g)?;
    inputs.recipe.validate()?;
    let recipe_nutrients = inputs.recipe.total_nutrients();

    let fed_kcal = kibble_kcal + inputs.treats_kcal;
    let total_kcal = fed_kcal + recipe_nutrients.kcal;
    let homemade_kcal_budget = (daily.mer - fed_kcal).max(0.0);

    // Kibble and treats only contribute energy to the totals.
    let nutrients_total = recipe_nutrients + Nutrients::energy_only(fed_kcal);
    let nutrients_per_1000_kcal = normalize_per_1000_kcal(&nutrients_total);
    let aafco_warnings = standards.evaluate(&nutrients_per_1000_kcal);
    let per_meal_grams = split_recipe_by_meals(&inputs.recipe, &inputs.meals);

    Ok(MealPlan {
        target_kcal: daily.mer,
        kibble_kcal,
        treats_kcal: inputs.treats_kcal,
        homemade_kcal_budget,
        total_kcal,
        nutrients_total,
        nutrients_per_1000_kcal,
        aafco_warnings,
        per_meal_grams,
    })
}

/// [`compute_meal_plan`] against the default standards table.
pub fn compute_meal_plan_default(inputs: &PlanInputs) -> Result<MealPlan> {
    compute_meal_plan(inputs, &StandardsTable::default())
}
