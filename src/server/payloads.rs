//! Request and response bodies.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::{Dog, Ingredient, MealPlan, Nutrients, Recipe};
use crate::planner::{PlanInputs, mer_factor};
use crate::storage::{Database, NewRecipeItem, StoredRecipe};

/// Body of `POST /compute-plan`, also accepted by `plan --input`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputePlanRequest {
    pub dog: Dog,
    pub mer_factor_key: String,
    pub kibble: Ingredient,
    pub kibble_grams: f64,
    #[serde(default)]
    pub treats_kcal: f64,

    /// Inline recipe. Exactly one of `recipe` and `recipe_id` is required.
    #[serde(default)]
    pub recipe: Option<Recipe>,
    #[serde(default)]
    pub recipe_id: Option<i64>,

    #[serde(default = "PlanInputs::default_meals")]
    pub meals: Vec<String>,

    /// Persist the computed plan.
    #[serde(default)]
    pub save: bool,
}

impl ComputePlanRequest {
    /// Validate the dog and kibble, then resolve the recipe (loading it from
    /// storage when referenced by id) and the MER factor into calculator
    /// inputs.
    pub async fn resolve(&self, db: &Database) -> Result<PlanInputs> {
        self.dog.validate()?;
        self.kibble.validate()?;
        let factor = mer_factor(&self.mer_factor_key)?;

        let recipe = match (&self.recipe, self.recipe_id) {
            (Some(_), Some(_)) => {
                return Err(PlannerError::invalid(
                    "give either recipe or recipe_id, not both",
                ));
            }
            (Some(recipe), None) => recipe.clone(),
            (None, Some(id)) => db
                .get_recipe(id)
                .await?
                .ok_or_else(|| PlannerError::NotFound(format!("recipe {id}")))?
                .to_recipe(),
            (None, None) => return Err(PlannerError::invalid("recipe or recipe_id is required")),
        };

        Ok(PlanInputs {
            dog: self.dog.clone(),
            mer_factor: factor,
            kibble: self.kibble.clone(),
            kibble_grams: self.kibble_grams,
            treats_kcal: self.treats_kcal,
            recipe,
            meals: self.meals.clone(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComputePlanResponse {
    #[serde(flatten)]
    pub plan: MealPlan,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UsdaIngredientRequest {
    /// Falls back to the configured key.
    #[serde(default)]
    pub api_key: Option<String>,
    pub fdc_id: u64,
    #[serde(default)]
    pub name_override: Option<String>,
    /// Also store the ingredient (replacing one with the same name).
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeTotalsResponse {
    pub kcal: f64,
    pub nutrients: Nutrients,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    #[serde(default)]
    pub items: Vec<NewRecipeItem>,
}

/// A stored recipe with its computed totals.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: StoredRecipe,
    pub total_grams: f64,
    pub nutrients: Nutrients,
}

impl From<StoredRecipe> for RecipeDetail {
    fn from(stored: StoredRecipe) -> Self {
        let recipe = stored.to_recipe();
        Self {
            total_grams: recipe.total_grams(),
            nutrients: recipe.total_nutrients(),
            recipe: stored,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct KcalToGramsQuery {
    pub desired_kcal: f64,
    pub kcal_per_100g: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MerFactorEntry {
    pub key: String,
    pub factor: f64,
    pub description: String,
}
