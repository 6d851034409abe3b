//! AAFCO-style nutrient minimums.
//!
//! The default table holds placeholder values for adult maintenance per
//! 1000 kcal. They are not authoritative; deployments override them with a
//! JSON file (see [`StandardsTable::load_overrides`]).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::{NutrientField, Nutrients};

/// Minimum for one nutrient, per 1000 kcal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientStandard {
    /// Display name used in warnings.
    pub name: String,
    pub minimum: f64,
    pub units: String,
}

impl NutrientStandard {
    pub fn new(name: &str, minimum: f64, units: &str) -> Self {
        Self {
            name: name.to_string(),
            minimum,
            units: units.to_string(),
        }
    }

    /// Warning text for a value below the minimum.
    pub fn warning(&self, value: f64) -> String {
        format!(
            "{} below minimum: {:.2}{} < {}{}",
            self.name,
            value,
            self.units,
            format_minimum(self.minimum),
            self.units
        )
    }
}

/// Shortest decimal form, keeping one decimal place on whole numbers
/// (`45.0`, `12.5`, `0.35`).
fn format_minimum(minimum: f64) -> String {
    if minimum.is_finite() && minimum.fract() == 0.0 {
        format!("{:.1}", minimum)
    } else {
        minimum.to_string()
    }
}

/// Nutrient field to minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandardsTable {
    entries: BTreeMap<NutrientField, NutrientStandard>,
}

impl Default for StandardsTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(NutrientField::ProteinG, NutrientStandard::new("protein", 45.0, "g"));
        entries.insert(NutrientField::FatG, NutrientStandard::new("fat", 13.0, "g"));
        entries.insert(
            NutrientField::CalciumMg,
            NutrientStandard::new("calcium", 1250.0, "mg"),
        );
        entries.insert(
            NutrientField::PhosphorusMg,
            NutrientStandard::new("phosphorus", 1000.0, "mg"),
        );
        entries.insert(NutrientField::IronMg, NutrientStandard::new("iron", 7.5, "mg"));
        entries.insert(NutrientField::ZincMg, NutrientStandard::new("zinc", 15.0, "mg"));
        entries.insert(
            NutrientField::VitaminAIu,
            NutrientStandard::new("vitamin A", 1250.0, "IU"),
        );
        entries.insert(
            NutrientField::VitaminDIu,
            NutrientStandard::new("vitamin D", 125.0, "IU"),
        );
        entries.insert(
            NutrientField::VitaminEMg,
            NutrientStandard::new("vitamin E", 12.5, "mg"),
        );
        Self { entries }
    }
}

impl StandardsTable {
    /// A table with no minimums; evaluation never warns.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: NutrientField) -> Option<&NutrientStandard> {
        self.entries.get(&field)
    }

    /// Add or replace the minimum for a field.
    pub fn set(&mut self, field: NutrientField, standard: NutrientStandard) {
        self.entries.insert(field, standard);
    }

    /// Drop the minimum for a field.
    pub fn remove(&mut self, field: NutrientField) -> Option<NutrientStandard> {
        self.entries.remove(&field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay entries from a JSON object keyed by nutrient field name.
    ///
    /// Fields present in the file replace the current entry; a `null` value
    /// removes the field from the table.
    pub fn load_overrides<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        let overrides: BTreeMap<String, Option<NutrientStandard>> =
            serde_json::from_str(&content)?;

        for (key, standard) in overrides {
            let field = NutrientField::parse(&key).ok_or_else(|| {
                PlannerError::Config(format!("unknown nutrient field in standards: {}", key))
            })?;
            match standard {
                Some(standard) => {
                    if !standard.minimum.is_finite() || standard.minimum < 0.0 {
                        return Err(PlannerError::Config(format!(
                            "minimum for {} must be non-negative",
                            key
                        )));
                    }
                    self.set(field, standard);
                }
                None => {
                    self.remove(field);
                }
            }
        }

        Ok(())
    }

    /// Defaults with the overrides from `path` applied, when one is given.
    pub fn with_overrides<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut table = Self::default();
        if let Some(path) = path {
            table.load_overrides(path)?;
        }
        Ok(table)
    }

    /// Compare normalized nutrients against every minimum in the table.
    ///
    /// Returns field name to warning for each minimum not met.
    pub fn evaluate(&self, nutrients_per_1000_kcal: &Nutrients) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(field, standard)| {
                let value = nutrients_per_1000_kcal.get(*field);
                (value < standard.minimum)
                    .then(|| (field.as_str().to_string(), standard.warning(value)))
            })
            .collect()
    }
}
