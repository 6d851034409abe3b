mod dog;
mod ingredient;
mod nutrients;
mod plan;

pub use dog::Dog;
pub use ingredient::{Ingredient, Recipe, RecipeItem};
pub use nutrients::{NutrientField, Nutrients};
pub use plan::MealPlan;
