use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Ingredient, Nutrients};

/// Flat CSV row: one ingredient with its per-100 g values.
#[derive(Debug, Serialize, Deserialize)]
struct IngredientRecord {
    name: String,
    kcal_per_100g: f64,
    #[serde(default)]
    protein_g: f64,
    #[serde(default)]
    fat_g: f64,
    #[serde(default)]
    carbs_g: f64,
    #[serde(default)]
    calcium_mg: f64,
    #[serde(default)]
    phosphorus_mg: f64,
    #[serde(default)]
    iron_mg: f64,
    #[serde(default)]
    zinc_mg: f64,
    #[serde(default)]
    vitamin_a_iu: f64,
    #[serde(default)]
    vitamin_d_iu: f64,
    #[serde(default)]
    vitamin_e_mg: f64,
}

impl From<IngredientRecord> for Ingredient {
    fn from(r: IngredientRecord) -> Self {
        Ingredient {
            name: r.name,
            kcal_per_100g: r.kcal_per_100g,
            nutrients_per_100g: Nutrients {
                kcal: r.kcal_per_100g,
                protein_g: r.protein_g,
                fat_g: r.fat_g,
                carbs_g: r.carbs_g,
                calcium_mg: r.calcium_mg,
                phosphorus_mg: r.phosphorus_mg,
                iron_mg: r.iron_mg,
                zinc_mg: r.zinc_mg,
                vitamin_a_iu: r.vitamin_a_iu,
                vitamin_d_iu: r.vitamin_d_iu,
                vitamin_e_mg: r.vitamin_e_mg,
            },
        }
    }
}

impl From<&Ingredient> for IngredientRecord {
    fn from(i: &Ingredient) -> Self {
        let n = &i.nutrients_per_100g;
        IngredientRecord {
            name: i.name.clone(),
            kcal_per_100g: i.kcal_per_100g,
            protein_g: n.protein_g,
            fat_g: n.fat_g,
            carbs_g: n.carbs_g,
            calcium_mg: n.calcium_mg,
            phosphorus_mg: n.phosphorus_mg,
            iron_mg: n.iron_mg,
            zinc_mg: n.zinc_mg,
            vitamin_a_iu: n.vitamin_a_iu,
            vitamin_d_iu: n.vitamin_d_iu,
            vitamin_e_mg: n.vitamin_e_mg,
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Deduplicate by lowercase name: last occurrence wins, first position kept.
fn dedupe(ingredients: Vec<Ingredient>) -> Vec<Ingredient> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Ingredient> = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        match index.get(&ingredient.key()) {
            Some(&i) => out[i] = ingredient,
            None => {
                index.insert(ingredient.key(), out.len());
                out.push(ingredient);
            }
        }
    }
    out
}

/// Load an ingredient library from a JSON array or a `.csv` file.
///
/// Every ingredient is validated. Duplicate names (case-insensitive) collapse
/// to the last occurrence.
pub fn load_ingredients<P: AsRef<Path>>(path: P) -> Result<Vec<Ingredient>> {
    let path = path.as_ref();

    let ingredients: Vec<Ingredient> = if is_csv(path) {
        let mut reader = csv::Reader::from_path(path)?;
        reader
            .deserialize::<IngredientRecord>()
            .map(|record| record.map(Ingredient::from))
            .collect::<std::result::Result<Vec<Ingredient>, csv::Error>>()?
    } else {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)?
    };

    let ingredients = dedupe(ingredients);
    for ingredient in &ingredients {
        ingredient.validate()?;
    }
    Ok(ingredients)
}

/// Save an ingredient library as JSON, or CSV when the path ends in `.csv`.
pub fn save_ingredients<P: AsRef<Path>>(path: P, ingredients: &[Ingredient]) -> Result<()> {
    let path = path.as_ref();
    let deduped = dedupe(ingredients.to_vec());

    if is_csv(path) {
        let mut writer = csv::Writer::from_path(path)?;
        for ingredient in &deduped {
            writer.serialize(IngredientRecord::from(ingredient))?;
        }
        writer.flush()?;
    } else {
        let json = serde_json::to_string_pretty(&deduped)?;
        fs::write(path, json)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_load_and_save_json_roundtrip() {
        let json = r#"[
            {"name": "Chicken", "kcal_per_100g": 165, "nutrients_per_100g": {"protein_g": 31, "fat_g": 3.6}},
            {"name": "Rice", "kcal_per_100g": 130}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let ingredients = load_ingredients(file.path()).unwrap();
        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[0].name, "Chicken");
        assert_eq!(ingredients[0].nutrients_per_100g.protein_g, 31.0);
        assert_eq!(ingredients[1].nutrients_per_100g, Nutrients::ZERO);

        let out_file = NamedTempFile::new().unwrap();
        save_ingredients(out_file.path(), &ingredients).unwrap();

        let reloaded = load_ingredients(out_file.path()).unwrap();
        assert_eq!(reloaded, ingredients);
    }

    #[test]
    fn test_deduplication() {
        let json = r#"[
            {"name": "Rice", "kcal_per_100g": 100},
            {"name": "Egg", "kcal_per_100g": 143},
            {"name": "rice", "kcal_per_100g": 130}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let ingredients = load_ingredients(file.path()).unwrap();
        assert_eq!(ingredients.len(), 2);
        // Last occurrence wins, first position kept
        assert_eq!(ingredients[0].name, "rice");
        assert_eq!(ingredients[0].kcal_per_100g, 130.0);
    }

    #[test]
    fn test_csv_with_missing_columns() {
        let csv = "name,kcal_per_100g,protein_g\nSalmon,208,20\nPumpkin,26,1\n";
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let ingredients = load_ingredients(file.path()).unwrap();
        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[0].kcal_per_100g, 208.0);
        assert_eq!(ingredients[0].nutrients_per_100g.protein_g, 20.0);
        assert_eq!(ingredients[1].nutrients_per_100g.zinc_mg, 0.0);
    }

    #[test]
    fn test_invalid_ingredient_rejected() {
        let json = r#"[{"name": "Bad", "kcal_per_100g": -1}]"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        assert!(load_ingredients(file.path()).is_err());
    }
}
