pub mod assembly;
pub mod calculations;
pub mod constants;

pub use assembly::{
    PlanInputs, compute_meal_plan, compute_meal_plan_default, normalize_per_1000_kcal,
    split_recipe_by_meals,
};
pub use calculations::{
    DailyCalories, calories_to_grams, compute_daily_calories, compute_mer, compute_rer,
    grams_to_calories, mer_factor,
};
pub use constants::*;
