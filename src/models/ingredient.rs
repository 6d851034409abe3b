use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::Nutrients;

/// A food with its energy density and nutrient profile, both per 100 g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,

    pub kcal_per_100g: f64,

    #[serde(default)]
    pub nutrients_per_100g: Nutrients,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, kcal_per_100g: f64, nutrients_per_100g: Nutrients) -> Self {
        Self {
            name: name.into(),
            kcal_per_100g,
            nutrients_per_100g,
        }
    }

    /// Ingredient that only carries energy (kibble is usually entered this way).
    pub fn energy_only(name: impl Into<String>, kcal_per_100g: f64) -> Self {
        Self::new(name, kcal_per_100g, Nutrients::ZERO)
    }

    /// Nutrients contributed by `grams` of this ingredient.
    ///
    /// Energy comes from `kcal_per_100g`, not from the `kcal` field of the
    /// per-100 g vector.
    pub fn nutrients_for(&self, grams: f64) -> Nutrients {
        self.nutrients_per_100g
            .with_kcal(self.kcal_per_100g)
            .scaled(grams / 100.0)
    }

    /// Basic validation: a name, and non-negative finite values.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PlannerError::invalid("ingredient name must not be empty"));
        }
        if !self.kcal_per_100g.is_finite() || self.kcal_per_100g < 0.0 {
            return Err(PlannerError::invalid(format!(
                "{}: kcal_per_100g must be non-negative",
                self.name
            )));
        }
        if !self.nutrients_per_100g.is_valid() {
            return Err(PlannerError::invalid(format!(
                "{}: nutrient values must be non-negative",
                self.name
            )));
        }
        Ok(())
    }

    /// Canonical key for lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// One ingredient in a recipe, with the amount used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeItem {
    pub ingredient: Ingredient,
    pub grams: f64,
}

impl RecipeItem {
    pub fn new(ingredient: Ingredient, grams: f64) -> Result<Self> {
        let item = Self { ingredient, grams };
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.grams.is_finite() || self.grams < 0.0 {
            return Err(PlannerError::invalid(format!(
                "grams must be non-negative (got {} for {})",
                self.grams, self.ingredient.name
            )));
        }
        Ok(())
    }

    pub fn nutrients(&self) -> Nutrients {
        self.ingredient.nutrients_for(self.grams)
    }
}

/// An ordered list of recipe items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub items: Vec<RecipeItem>,
}

impl Recipe {
    pub fn new(items: Vec<RecipeItem>) -> Self {
        Self { items }
    }

    /// Sum of every item's scaled nutrients. Empty recipe yields zero.
    pub fn total_nutrients(&self) -> Nutrients {
        self.items.iter().map(RecipeItem::nutrients).sum()
    }

    /// Total mass of the recipe in grams; `0.0` (not `-0.0`) when empty.
    pub fn total_grams(&self) -> f64 {
        self.items.iter().fold(0.0, |acc, item| acc + item.grams)
    }

    pub fn validate(&self) -> Result<()> {
        self.items.iter().try_for_each(RecipeItem::validate)
    }
}
