use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::models::{MealPlan, NutrientField};
use crate::planner::{mer_factor_name, mer_factor_table};
use crate::storage::StoredIngredient;

/// Display a meal plan: energy summary, nutrient table, warnings and meals.
pub fn display_meal_plan(plan: &MealPlan) {
    println!();
    println!("=== Meal Plan ===");
    println!();
    println!("Daily target (MER):   {:>8.1} kcal", plan.target_kcal);
    println!("Kibble:               {:>8.1} kcal", plan.kibble_kcal);
    println!("Treats:               {:>8.1} kcal", plan.treats_kcal);
    println!("Homemade budget:      {:>8.1} kcal", plan.homemade_kcal_budget);
    println!("Total fed:            {:>8.1} kcal", plan.total_kcal);

    let diff = plan.total_kcal - plan.target_kcal;
    let sign = if diff >= 0.0 { "+" } else { "" };
    println!("vs target:            {:>8} kcal", format!("{}{:.1}", sign, diff));

    println!();
    println!("--- Nutrients ---");
    println!("{:<16} {:>12} {:>14}", "nutrient", "total", "per 1000 kcal");
    for field in NutrientField::ALL {
        let flag = if plan.aafco_warnings.contains_key(field.as_str()) {
            "  !"
        } else {
            ""
        };
        println!(
            "{:<16} {:>12.2} {:>14.2}{}",
            field.as_str(),
            plan.nutrients_total.get(field),
            plan.nutrients_per_1000_kcal.get(field),
            flag
        );
    }

    if plan.has_warnings() {
        println!();
        println!("--- Warnings ---");
        for warning in plan.aafco_warnings.values() {
            println!("  {}", warning);
        }
    }

    if !plan.per_meal_grams.is_empty() {
        println!();
        println!("--- Homemade portion per meal ---");
        for (meal, grams) in &plan.per_meal_grams {
            println!("  {:<12} {:>8.1} g", meal, grams);
        }
    }
    println!();
}

/// Display stored ingredients with their density and headline macros.
pub fn display_ingredient_list(ingredients: &[StoredIngredient]) {
    if ingredients.is_empty() {
        println!("Ingredients: (none)");
        return;
    }

    println!();
    println!("=== Ingredients ({} items) ===", ingredients.len());
    println!();

    let width = ingredients
        .iter()
        .map(|s| s.ingredient.name.len())
        .max()
        .unwrap_or(10);

    for stored in ingredients {
        let i = &stored.ingredient;
        let n = &i.nutrients_per_100g;
        println!(
            "{:>4}. {:<width$} - {:>6.1} kcal/100g | P:{:.1} F:{:.1} C:{:.1}",
            stored.id,
            i.name,
            i.kcal_per_100g,
            n.protein_g,
            n.fat_g,
            n.carbs_g,
            width = width
        );
    }

    println!();
}

/// Display the MER factor table.
pub fn display_mer_factors() {
    println!("{:<16} {:>6}  description", "key", "factor");
    for (key, factor) in mer_factor_table() {
        println!("{:<16} {:>6.1}  {}", key, factor, mer_factor_name(key));
    }
}

#[derive(Debug, Serialize)]
struct NutrientRow<'a> {
    nutrient: &'a str,
    total: f64,
    per_1000_kcal: f64,
    warning: &'a str,
}

/// Write the plan's nutrient breakdown as CSV, one row per nutrient.
pub fn write_plan_csv<P: AsRef<Path>>(path: P, plan: &MealPlan) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for field in NutrientField::ALL {
        writer.serialize(NutrientRow {
            nutrient: field.as_str(),
            total: plan.nutrients_total.get(field),
            per_1000_kcal: plan.nutrients_per_1000_kcal.get(field),
            warning: plan
                .aafco_warnings
                .get(field.as_str())
                .map(String::as_str)
                .unwrap_or(""),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrients;
    use std::collections::BTreeMap;
    use tempfile::Builder;

    #[test]
    fn test_write_plan_csv() {
        let mut warnings = BTreeMap::new();
        warnings.insert("fat_g".to_string(), "fat below minimum".to_string());
        let plan = MealPlan {
            target_kcal: 600.0,
            kibble_kcal: 0.0,
            treats_kcal: 0.0,
            homemade_kcal_budget: 600.0,
            total_kcal: 500.0,
            nutrients_total: Nutrients {
                kcal: 500.0,
                protein_g: 40.0,
                ..Nutrients::ZERO
            },
            nutrients_per_1000_kcal: Nutrients {
                kcal: 1000.0,
                protein_g: 80.0,
                ..Nutrients::ZERO
            },
            aafco_warnings: warnings,
            per_meal_grams: BTreeMap::new(),
        };

        let file = Builder::new().suffix(".csv").tempfile().unwrap();
        write_plan_csv(file.path(), &plan).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "nutrient,total,per_1000_kcal,warning");
        assert_eq!(lines.len(), 1 + NutrientField::ALL.len());
        assert!(lines.contains(&"protein_g,40.0,80.0,"));
        assert!(lines.contains(&"fat_g,0.0,0.0,fat below minimum"));
    }
}
