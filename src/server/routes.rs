use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};
use tracing::info;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::payloads::{
    ComputePlanRequest, ComputePlanResponse, CreateRecipeRequest, KcalToGramsQuery,
    MerFactorEntry, RecipeDetail, RecipeTotalsResponse, UsdaIngredientRequest,
};
use super::state::AppState;
use crate::error::{PlannerError, Result};
use crate::models::{Ingredient, Recipe};
use crate::planner::{
    calories_to_grams, compute_meal_plan, compute_rer, mer_factor_name, mer_factor_table,
};
use crate::standards::StandardsTable;
use crate::storage::{PlanSummary, RecipeSummary, StoredIngredient, StoredPlan};
use crate::usda::{UsdaClient, ingredient_from_usda};

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn compute_plan_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ComputePlanRequest>,
) -> Result<Json<ComputePlanResponse>> {
    let inputs = request.resolve(&state.db).await?;
    let plan = compute_meal_plan(&inputs, &state.standards)?;

    let plan_id = if request.save {
        let id = state
            .db
            .save_plan(&request.dog, &request.mer_factor_key, &plan)
            .await?;
        info!(plan_id = id, "Stored plan");
        Some(id)
    } else {
        None
    };

    Ok(Json(ComputePlanResponse { plan, plan_id }))
}

pub async fn usda_ingredient_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<UsdaIngredientRequest>,
) -> Result<Json<Ingredient>> {
    let api_key = request
        .api_key
        .clone()
        .or_else(|| state.config.usda_api_key.clone())
        .ok_or_else(|| PlannerError::invalid("api_key is required (no USDA_API_KEY configured)"))?;

    let client = UsdaClient::with_base_url(api_key, state.config.usda_base_url.as_str())?;
    let food = client.fetch_food(request.fdc_id).await?;
    let ingredient = ingredient_from_usda(&food, request.name_override.as_deref());

    if request.save {
        let stored = state.db.upsert_ingredient(&ingredient).await?;
        info!(id = stored.id, name = %ingredient.name, "Stored USDA ingredient");
    }

    Ok(Json(ingredient))
}

pub async fn manual_ingredient_handler(
    ApiJson(ingredient): ApiJson<Ingredient>,
) -> Result<Json<Ingredient>> {
    ingredient.validate()?;
    Ok(Json(ingredient))
}

pub async fn recipe_totals_handler(
    ApiJson(recipe): ApiJson<Recipe>,
) -> Result<Json<RecipeTotalsResponse>> {
    recipe.validate()?;
    let nutrients = recipe.total_nutrients();
    Ok(Json(RecipeTotalsResponse {
        kcal: nutrients.kcal,
        nutrients,
    }))
}

pub async fn rer_handler(ApiPath(weight_kg): ApiPath<f64>) -> Result<Json<Value>> {
    let rer = compute_rer(weight_kg)?;
    Ok(Json(json!({ "rer": rer })))
}

pub async fn kcal_to_grams_handler(
    ApiQuery(query): ApiQuery<KcalToGramsQuery>,
) -> Result<Json<Value>> {
    let grams = calories_to_grams(query.desired_kcal, query.kcal_per_100g)?;
    Ok(Json(json!({ "grams": grams })))
}

pub async fn mer_factors_handler() -> Json<Vec<MerFactorEntry>> {
    Json(
        mer_factor_table()
            .into_iter()
            .map(|(key, factor)| MerFactorEntry {
                key: key.to_string(),
                factor,
                description: mer_factor_name(key).to_string(),
            })
            .collect(),
    )
}

pub async fn standards_handler(State(state): State<Arc<AppState>>) -> Json<StandardsTable> {
    Json(state.standards.clone())
}

pub async fn create_ingredient_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(ingredient): ApiJson<Ingredient>,
) -> Result<impl IntoResponse> {
    let stored = state.db.create_ingredient(&ingredient).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_ingredients_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredIngredient>>> {
    Ok(Json(state.db.list_ingredients().await?))
}

pub async fn get_ingredient_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<StoredIngredient>> {
    state
        .db
        .get_ingredient(id)
        .await?
        .map(Json)
        .ok_or_else(|| PlannerError::NotFound(format!("ingredient {id}")))
}

pub async fn delete_ingredient_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    state.db.delete_ingredient(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_recipe_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse> {
    let stored = state.db.create_recipe(&request.name, &request.items).await?;
    Ok((StatusCode::CREATED, Json(RecipeDetail::from(stored))))
}

pub async fn list_recipes_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RecipeSummary>>> {
    Ok(Json(state.db.list_recipes().await?))
}

pub async fn get_recipe_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<RecipeDetail>> {
    state
        .db
        .get_recipe(id)
        .await?
        .map(|recipe| Json(RecipeDetail::from(recipe)))
        .ok_or_else(|| PlannerError::NotFound(format!("recipe {id}")))
}

pub async fn delete_recipe_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    state.db.delete_recipe(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_plans_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlanSummary>>> {
    Ok(Json(state.db.list_plans().await?))
}

pub async fn get_plan_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<StoredPlan>> {
    state
        .db
        .get_plan(id)
        .await?
        .map(Json)
        .ok_or_else(|| PlannerError::NotFound(format!("plan {id}")))
}
