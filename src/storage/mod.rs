//! # Storage
//!
//! SQLite persistence for ingredients, recipes and computed plans, plus
//! ingredient library files.
//!
//! One table per entity, hand-written SQL, schema created on connect:
//!
//! - `ingredients`: name (unique, case-insensitive), density, 11 nutrient columns
//! - `recipes`: name
//! - `recipe_items`: recipe, ingredient, grams, position
//! - `plans`: dog, factor key, headline energies, full plan as JSON

mod files;
mod ingredients;
mod plans;
mod recipes;

pub use files::{load_ingredients, save_ingredients};
pub use ingredients::StoredIngredient;
pub use plans::{PlanSummary, StoredPlan};
pub use recipes::{NewRecipeItem, RecipeSummary, StoredRecipe, StoredRecipeItem};

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::{PlannerError, Result};

/// Handle to the SQLite database.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect (creating the file if needed) and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Each connection to :memory: opens its own empty database.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options).await?;
        info!("Connected to {database_url}");

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database, used by tests and one-off CLI runs.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    pub async fn migrate(&self) -> Result<()> {
        self.migrate_ingredients().await?;
        self.migrate_recipes().await?;
        self.migrate_plans().await?;
        debug!("Schema ready");
        Ok(())
    }
}

/// Map constraint violations onto domain errors; everything else stays a
/// database error.
pub(crate) fn classify(err: sqlx::Error, what: &str) -> PlannerError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return PlannerError::Conflict(format!("{what} already exists"));
        }
        if db_err.is_foreign_key_violation() {
            return PlannerError::Conflict(format!("{what} references missing or in-use rows"));
        }
    }
    PlannerError::Database(err)
}
