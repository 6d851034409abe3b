use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::debug;

use super::{Database, classify};
use crate::error::{PlannerError, Result};
use crate::models::{Ingredient, Nutrients};

const INGREDIENT_COLUMNS: &str = "id, name, kcal_per_100g, kcal, protein_g, fat_g, carbs_g, \
     calcium_mg, phosphorus_mg, iron_mg, zinc_mg, vitamin_a_iu, vitamin_d_iu, vitamin_e_mg";

/// An ingredient with its storage id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredIngredient {
    pub id: i64,

    #[serde(flatten)]
    pub ingredient: Ingredient,
}

impl Database {
    pub(super) async fn migrate_ingredients(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                kcal_per_100g REAL NOT NULL,
                kcal REAL NOT NULL DEFAULT 0,
                protein_g REAL NOT NULL DEFAULT 0,
                fat_g REAL NOT NULL DEFAULT 0,
                carbs_g REAL NOT NULL DEFAULT 0,
                calcium_mg REAL NOT NULL DEFAULT 0,
                phosphorus_mg REAL NOT NULL DEFAULT 0,
                iron_mg REAL NOT NULL DEFAULT 0,
                zinc_mg REAL NOT NULL DEFAULT 0,
                vitamin_a_iu REAL NOT NULL DEFAULT 0,
                vitamin_d_iu REAL NOT NULL DEFAULT 0,
                vitamin_e_mg REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new ingredient. A name already in use is a conflict.
    pub async fn create_ingredient(&self, ingredient: &Ingredient) -> Result<StoredIngredient> {
        ingredient.validate()?;
        let n = &ingredient.nutrients_per_100g;

        let result = sqlx::query(
            r"
            INSERT INTO ingredients (
                name, kcal_per_100g, kcal, protein_g, fat_g, carbs_g, calcium_mg,
                phosphorus_mg, iron_mg, zinc_mg, vitamin_a_iu, vitamin_d_iu, vitamin_e_mg
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(&ingredient.name)
        .bind(ingredient.kcal_per_100g)
        .bind(n.kcal)
        .bind(n.protein_g)
        .bind(n.fat_g)
        .bind(n.carbs_g)
        .bind(n.calcium_mg)
        .bind(n.phosphorus_mg)
        .bind(n.iron_mg)
        .bind(n.zinc_mg)
        .bind(n.vitamin_a_iu)
        .bind(n.vitamin_d_iu)
        .bind(n.vitamin_e_mg)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, &format!("ingredient '{}'", ingredient.name)))?;

        let id = result.last_insert_rowid();
        debug!(id, name = %ingredient.name, "Created ingredient");

        Ok(StoredIngredient {
            id,
            ingredient: ingredient.clone(),
        })
    }

    /// Insert or replace an ingredient by (case-insensitive) name.
    pub async fn upsert_ingredient(&self, ingredient: &Ingredient) -> Result<StoredIngredient> {
        ingredient.validate()?;
        let n = &ingredient.nutrients_per_100g;

        let row = sqlx::query(
            r"
            INSERT INTO ingredients (
                name, kcal_per_100g, kcal, protein_g, fat_g, carbs_g, calcium_mg,
                phosphorus_mg, iron_mg, zinc_mg, vitamin_a_iu, vitamin_d_iu, vitamin_e_mg
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT(name) DO UPDATE SET
                kcal_per_100g = excluded.kcal_per_100g,
                kcal = excluded.kcal,
                protein_g = excluded.protein_g,
                fat_g = excluded.fat_g,
                carbs_g = excluded.carbs_g,
                calcium_mg = excluded.calcium_mg,
                phosphorus_mg = excluded.phosphorus_mg,
                iron_mg = excluded.iron_mg,
                zinc_mg = excluded.zinc_mg,
                vitamin_a_iu = excluded.vitamin_a_iu,
                vitamin_d_iu = excluded.vitamin_d_iu,
                vitamin_e_mg = excluded.vitamin_e_mg
            RETURNING id
            ",
        )
        .bind(&ingredient.name)
        .bind(ingredient.kcal_per_100g)
        .bind(n.kcal)
        .bind(n.protein_g)
        .bind(n.fat_g)
        .bind(n.carbs_g)
        .bind(n.calcium_mg)
        .bind(n.phosphorus_mg)
        .bind(n.iron_mg)
        .bind(n.zinc_mg)
        .bind(n.vitamin_a_iu)
        .bind(n.vitamin_d_iu)
        .bind(n.vitamin_e_mg)
        .fetch_one(&self.pool)
        .await?;

        Ok(StoredIngredient {
            id: row.try_get("id")?,
            ingredient: ingredient.clone(),
        })
    }

    pub async fn get_ingredient(&self, id: i64) -> Result<Option<StoredIngredient>> {
        let row = sqlx::query(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_ingredient(&r)).transpose()
    }

    /// Fetch an ingredient by name (case-insensitive).
    pub async fn find_ingredient(&self, name: &str) -> Result<Option<StoredIngredient>> {
        let row = sqlx::query(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_ingredient(&r)).transpose()
    }

    /// All ingredients ordered by name.
    pub async fn list_ingredients(&self) -> Result<Vec<StoredIngredient>> {
        let rows = sqlx::query(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients ORDER BY name COLLATE NOCASE"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_ingredient).collect()
    }

    /// Delete an ingredient. Ingredients used by a recipe cannot be deleted.
    pub async fn delete_ingredient(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, &format!("ingredient {id}")))?;

        if result.rows_affected() == 0 {
            return Err(PlannerError::NotFound(format!("ingredient {id}")));
        }
        Ok(())
    }
}

pub(super) fn row_to_ingredient(row: &SqliteRow) -> Result<StoredIngredient> {
    Ok(StoredIngredient {
        id: row.try_get("id")?,
        ingredient: Ingredient {
            name: row.try_get("name")?,
            kcal_per_100g: row.try_get("kcal_per_100g")?,
            nutrients_per_100g: Nutrients {
                kcal: row.try_get("kcal")?,
                protein_g: row.try_get("protein_g")?,
                fat_g: row.try_get("fat_g")?,
                carbs_g: row.try_get("carbs_g")?,
                calcium_mg: row.try_get("calcium_mg")?,
                phosphorus_mg: row.try_get("phosphorus_mg")?,
                iron_mg: row.try_get("iron_mg")?,
                zinc_mg: row.try_get("zinc_mg")?,
                vitamin_a_iu: row.try_get("vitamin_a_iu")?,
                vitamin_d_iu: row.try_get("vitamin_d_iu")?,
                vitamin_e_mg: row.try_get("vitamin_e_mg")?,
            },
        },
    })
}
