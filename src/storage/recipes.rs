use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::debug;

use super::{Database, classify};
use crate::error::{PlannerError, Result};
use crate::models::{Ingredient, Recipe, RecipeItem};

/// Item of a recipe being created: a stored ingredient and its amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecipeItem {
    pub ingredient_id: i64,
    pub grams: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecipeItem {
    pub ingredient_id: i64,
    pub ingredient: Ingredient,
    pub grams: f64,
}

/// A recipe with its items resolved to full ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecipe {
    pub id: i64,
    pub name: String,
    pub items: Vec<StoredRecipeItem>,
    pub created_at: String,
}

impl StoredRecipe {
    /// Calculator view of this recipe.
    pub fn to_recipe(&self) -> Recipe {
        Recipe::new(
            self.items
                .iter()
                .map(|item| RecipeItem {
                    ingredient: item.ingredient.clone(),
                    grams: item.grams,
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub item_count: i64,
    pub total_grams: f64,
    pub created_at: String,
}

impl Database {
    pub(super) async fn migrate_recipes(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id),
                grams REAL NOT NULL CHECK (grams >= 0),
                position INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_recipe_items_recipe ON recipe_items(recipe_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create a recipe and its items in one transaction.
    pub async fn create_recipe(&self, name: &str, items: &[NewRecipeItem]) -> Result<StoredRecipe> {
        if name.trim().is_empty() {
            return Err(PlannerError::invalid("recipe name must not be empty"));
        }
        if let Some(bad) = items.iter().find(|i| !i.grams.is_finite() || i.grams < 0.0) {
            return Err(PlannerError::invalid(format!(
                "grams must be non-negative (got {} for ingredient {})",
                bad.grams, bad.ingredient_id
            )));
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO recipes (name) VALUES ($1)")
            .bind(name)
            .execute(&mut *tx)
            .await?;
        let recipe_id = result.last_insert_rowid();

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO recipe_items (recipe_id, ingredient_id, grams, position)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(recipe_id)
            .bind(item.ingredient_id)
            .bind(item.grams)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| match classify(e, "recipe item") {
                PlannerError::Conflict(_) => {
                    PlannerError::NotFound(format!("ingredient {}", item.ingredient_id))
                }
                other => other,
            })?;
        }

        tx.commit().await?;
        debug!(recipe_id, name, items = items.len(), "Created recipe");

        self.get_recipe(recipe_id)
            .await?
            .ok_or_else(|| PlannerError::NotFound(format!("recipe {recipe_id}")))
    }

    pub async fn get_recipe(&self, id: i64) -> Result<Option<StoredRecipe>> {
        let Some(recipe_row) =
            sqlx::query("SELECT id, name, created_at FROM recipes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };

        let item_rows = sqlx::query(
            r"
            SELECT ri.grams, i.id, i.name, i.kcal_per_100g, i.kcal, i.protein_g, i.fat_g,
                   i.carbs_g, i.calcium_mg, i.phosphorus_mg, i.iron_mg, i.zinc_mg,
                   i.vitamin_a_iu, i.vitamin_d_iu, i.vitamin_e_mg
            FROM recipe_items ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.position
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .iter()
            .map(|row| {
                let stored = super::ingredients::row_to_ingredient(row)?;
                Ok(StoredRecipeItem {
                    ingredient_id: stored.id,
                    ingredient: stored.ingredient,
                    grams: row.try_get("grams")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(StoredRecipe {
            id: recipe_row.try_get("id")?,
            name: recipe_row.try_get("name")?,
            items,
            created_at: recipe_row.try_get("created_at")?,
        }))
    }

    pub async fn list_recipes(&self) -> Result<Vec<RecipeSummary>> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.name, r.created_at,
                   COUNT(ri.id) AS item_count,
                   COALESCE(SUM(ri.grams), 0.0) AS total_grams
            FROM recipes r
            LEFT JOIN recipe_items ri ON ri.recipe_id = r.id
            GROUP BY r.id
            ORDER BY r.id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(RecipeSummary {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    item_count: row.try_get("item_count")?,
                    total_grams: row.try_get("total_grams")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    pub async fn delete_recipe(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PlannerError::NotFound(format!("recipe {id}")));
        }
        Ok(())
    }
}
