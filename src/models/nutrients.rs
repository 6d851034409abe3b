use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Fixed nutrient vector: energy plus ten macro/micro-nutrients.
///
/// Per-100 g when attached to an ingredient, absolute when totalled for a
/// recipe or plan, per 1000 kcal after normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrients {
    pub kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub calcium_mg: f64,
    pub phosphorus_mg: f64,
    pub iron_mg: f64,
    pub zinc_mg: f64,
    pub vitamin_a_iu: f64,
    pub vitamin_d_iu: f64,
    pub vitamin_e_mg: f64,
}

impl Nutrients {
    /// The all-zero vector.
    pub const ZERO: Nutrients = Nutrients {
        kcal: 0.0,
        protein_g: 0.0,
        fat_g: 0.0,
        carbs_g: 0.0,
        calcium_mg: 0.0,
        phosphorus_mg: 0.0,
        iron_mg: 0.0,
        zinc_mg: 0.0,
        vitamin_a_iu: 0.0,
        vitamin_d_iu: 0.0,
        vitamin_e_mg: 0.0,
    };

    /// A vector whose only nonzero field is energy.
    pub fn energy_only(kcal: f64) -> Self {
        Nutrients {
            kcal,
            ..Nutrients::ZERO
        }
    }

    /// Multiply every field by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Nutrients {
            kcal: self.kcal * factor,
            protein_g: self.protein_g * factor,
            fat_g: self.fat_g * factor,
            carbs_g: self.carbs_g * factor,
            calcium_mg: self.calcium_mg * factor,
            phosphorus_mg: self.phosphorus_mg * factor,
            iron_mg: self.iron_mg * factor,
            zinc_mg: self.zinc_mg * factor,
            vitamin_a_iu: self.vitamin_a_iu * factor,
            vitamin_d_iu: self.vitamin_d_iu * factor,
            vitamin_e_mg: self.vitamin_e_mg * factor,
        }
    }

    /// Copy with the energy field replaced.
    pub fn with_kcal(&self, kcal: f64) -> Self {
        Nutrients { kcal, ..*self }
    }

    /// Read one field by name.
    pub fn get(&self, field: NutrientField) -> f64 {
        match field {
            NutrientField::Kcal => self.kcal,
            NutrientField::ProteinG => self.protein_g,
            NutrientField::FatG => self.fat_g,
            NutrientField::CarbsG => self.carbs_g,
            NutrientField::CalciumMg => self.calcium_mg,
            NutrientField::PhosphorusMg => self.phosphorus_mg,
            NutrientField::IronMg => self.iron_mg,
            NutrientField::ZincMg => self.zinc_mg,
            NutrientField::VitaminAIu => self.vitamin_a_iu,
            NutrientField::VitaminDIu => self.vitamin_d_iu,
            NutrientField::VitaminEMg => self.vitamin_e_mg,
        }
    }

    /// Write one field by name.
    pub fn set(&mut self, field: NutrientField, value: f64) {
        let slot = match field {
            NutrientField::Kcal => &mut self.kcal,
            NutrientField::ProteinG => &mut self.protein_g,
            NutrientField::FatG => &mut self.fat_g,
            NutrientField::CarbsG => &mut self.carbs_g,
            NutrientField::CalciumMg => &mut self.calcium_mg,
            NutrientField::PhosphorusMg => &mut self.phosphorus_mg,
            NutrientField::IronMg => &mut self.iron_mg,
            NutrientField::ZincMg => &mut self.zinc_mg,
            NutrientField::VitaminAIu => &mut self.vitamin_a_iu,
            NutrientField::VitaminDIu => &mut self.vitamin_d_iu,
            NutrientField::VitaminEMg => &mut self.vitamin_e_mg,
        };
        *slot = value;
    }

    /// Field/value pairs in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (NutrientField, f64)> + '_ {
        NutrientField::ALL
            .into_iter()
            .map(move |f| (f, self.get(f)))
    }

    /// True when no field is negative or non-finite.
    pub fn is_valid(&self) -> bool {
        self.entries().all(|(_, v)| v.is_finite() && v >= 0.0)
    }
}

impl Add for Nutrients {
    type Output = Nutrients;

    fn add(self, other: Nutrients) -> Nutrients {
        Nutrients {
            kcal: self.kcal + other.kcal,
            protein_g: self.protein_g + other.protein_g,
            fat_g: self.fat_g + other.fat_g,
            carbs_g: self.carbs_g + other.carbs_g,
            calcium_mg: self.calcium_mg + other.calcium_mg,
            phosphorus_mg: self.phosphorus_mg + other.phosphorus_mg,
            iron_mg: self.iron_mg + other.iron_mg,
            zinc_mg: self.zinc_mg + other.zinc_mg,
            vitamin_a_iu: self.vitamin_a_iu + other.vitamin_a_iu,
            vitamin_d_iu: self.vitamin_d_iu + other.vitamin_d_iu,
            vitamin_e_mg: self.vitamin_e_mg + other.vitamin_e_mg,
        }
    }
}

impl AddAssign for Nutrients {
    fn add_assign(&mut self, other: Nutrients) {
        *self = *self + other;
    }
}

impl Sum for Nutrients {
    fn sum<I: Iterator<Item = Nutrients>>(iter: I) -> Nutrients {
        iter.fold(Nutrients::ZERO, Add::add)
    }
}

/// Names of the [`Nutrients`] fields.
///
/// Serialized with the same snake_case names the vector uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientField {
    Kcal,
    ProteinG,
    FatG,
    CarbsG,
    CalciumMg,
    PhosphorusMg,
    IronMg,
    ZincMg,
    VitaminAIu,
    VitaminDIu,
    VitaminEMg,
}

impl NutrientField {
    pub const ALL: [NutrientField; 11] = [
        NutrientField::Kcal,
        NutrientField::ProteinG,
        NutrientField::FatG,
        NutrientField::CarbsG,
        NutrientField::CalciumMg,
        NutrientField::PhosphorusMg,
        NutrientField::IronMg,
        NutrientField::ZincMg,
        NutrientField::VitaminAIu,
        NutrientField::VitaminDIu,
        NutrientField::VitaminEMg,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            NutrientField::Kcal => "kcal",
            NutrientField::ProteinG => "protein_g",
            NutrientField::FatG => "fat_g",
            NutrientField::CarbsG => "carbs_g",
            NutrientField::CalciumMg => "calcium_mg",
            NutrientField::PhosphorusMg => "phosphorus_mg",
            NutrientField::IronMg => "iron_mg",
            NutrientField::ZincMg => "zinc_mg",
            NutrientField::VitaminAIu => "vitamin_a_iu",
            NutrientField::VitaminDIu => "vitamin_d_iu",
            NutrientField::VitaminEMg => "vitamin_e_mg",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        NutrientField::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl fmt::Display for NutrientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
