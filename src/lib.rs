pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod server;
pub mod standards;
pub mod storage;
pub mod usda;

pub use error::{PlannerError, Result};
pub use models::{Dog, Ingredient, MealPlan, NutrientField, Nutrients, Recipe, RecipeItem};
