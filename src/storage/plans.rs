use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::models::{Dog, MealPlan};

/// A saved plan together with the inputs that identify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlan {
    pub id: i64,
    pub dog: Dog,
    pub mer_factor_key: String,
    pub plan: MealPlan,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: i64,
    pub dog_weight_kg: f64,
    pub mer_factor_key: String,
    pub target_kcal: f64,
    pub total_kcal: f64,
    pub created_at: String,
}

impl Database {
    pub(super) async fn migrate_plans(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                dog_weight_kg REAL NOT NULL,
                mer_factor_key TEXT NOT NULL,
                target_kcal REAL NOT NULL,
                total_kcal REAL NOT NULL,
                dog_json TEXT NOT NULL,
                plan_json TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist a computed plan; returns its id.
    pub async fn save_plan(&self, dog: &Dog, mer_factor_key: &str, plan: &MealPlan) -> Result<i64> {
        let dog_json = serde_json::to_string(dog)?;
        let plan_json = serde_json::to_string(plan)?;

        let result = sqlx::query(
            r"
            INSERT INTO plans (
                dog_weight_kg, mer_factor_key, target_kcal, total_kcal, dog_json, plan_json
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(dog.weight_kg)
        .bind(mer_factor_key)
        .bind(plan.target_kcal)
        .bind(plan.total_kcal)
        .bind(&dog_json)
        .bind(&plan_json)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, mer_factor_key, "Saved plan");
        Ok(id)
    }

    pub async fn get_plan(&self, id: i64) -> Result<Option<StoredPlan>> {
        let row = sqlx::query(
            r"
            SELECT id, mer_factor_key, dog_json, plan_json, created_at
            FROM plans
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_plan(&r)).transpose()
    }

    /// Most recent plans first.
    pub async fn list_plans(&self) -> Result<Vec<PlanSummary>> {
        let rows = sqlx::query(
            r"
            SELECT id, dog_weight_kg, mer_factor_key, target_kcal, total_kcal, created_at
            FROM plans
            ORDER BY id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(PlanSummary {
                    id: row.try_get("id")?,
                    dog_weight_kg: row.try_get("dog_weight_kg")?,
                    mer_factor_key: row.try_get("mer_factor_key")?,
                    target_kcal: row.try_get("target_kcal")?,
                    total_kcal: row.try_get("total_kcal")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}

fn row_to_plan(row: &SqliteRow) -> Result<StoredPlan> {
    let dog_json: String = row.try_get("dog_json")?;
    let plan_json: String = row.try_get("plan_json")?;

    Ok(StoredPlan {
        id: row.try_get("id")?,
        dog: serde_json::from_str(&dog_json)?,
        mer_factor_key: row.try_get("mer_factor_key")?,
        plan: serde_json::from_str(&plan_json)?,
        created_at: row.try_get("created_at")?,
    })
}
