use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{PlannerError, Result};
use crate::models::{Dog, Ingredient, Recipe, RecipeItem};
use crate::planner::{DEFAULT_MEALS, mer_factor_name, mer_factor_table};
use crate::server::payloads::ComputePlanRequest;
use crate::storage::StoredIngredient;

/// Minimum Jaro-Winkler score for an ingredient to be offered as a match.
const FUZZY_MATCH_THRESHOLD: f64 = 0.7;
const MAX_CANDIDATES: usize = 5;

fn prompt_number(prompt: &str, default: &str) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| PlannerError::invalid(format!("Invalid number: {}", input)))
}

/// Prompt for a value that must be positive.
fn prompt_positive(prompt: &str, default: &str) -> Result<f64> {
    let value = prompt_number(prompt, default)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(PlannerError::invalid(format!("{} must be positive", prompt)));
    }
    Ok(value)
}

/// Prompt for a value that must be zero or more.
fn prompt_non_negative(prompt: &str, default: &str) -> Result<f64> {
    let value = prompt_number(prompt, default)?;
    if !value.is_finite() || value < 0.0 {
        return Err(PlannerError::invalid(format!("{} must not be negative", prompt)));
    }
    Ok(value)
}

/// Prompt for the dog's profile.
pub fn prompt_dog() -> Result<Dog> {
    let weight_kg = prompt_positive("Dog weight (kg)", "10")?;
    let age_years = prompt_non_negative("Age (years)", "3")?;

    let sexes = ["male", "female"];
    let sex = Select::new()
        .with_prompt("Sex")
        .items(&sexes)
        .default(0)
        .interact()?;

    let neutered = prompt_yes_no("Neutered?", true)?;

    let activity: String = Input::new()
        .with_prompt("Activity level")
        .default("normal".to_string())
        .interact_text()?;

    Ok(Dog {
        weight_kg,
        target_weight_kg: None,
        age_years,
        sex: sexes[sex].to_string(),
        neutered,
        activity,
    })
}

/// Pick an MER factor key from the table.
pub fn prompt_mer_factor(neutered: bool) -> Result<String> {
    let table = mer_factor_table();
    let options: Vec<String> = table
        .iter()
        .map(|(key, factor)| format!("{:<16} x{:.1}  ({})", key, factor, mer_factor_name(key)))
        .collect();

    let default_key = if neutered { "neutered_adult" } else { "intact_adult" };
    let default = table
        .iter()
        .position(|(key, _)| *key == default_key)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Life stage / activity factor")
        .items(&options)
        .default(default)
        .interact()?;

    table
        .get(selection)
        .map(|(key, _)| key.to_string())
        .ok_or_else(|| PlannerError::invalid("No factor selected"))
}

/// Prompt for the kibble and its daily amount.
pub fn prompt_kibble() -> Result<(Ingredient, f64)> {
    let name: String = Input::new()
        .with_prompt("Kibble name")
        .default("kibble".to_string())
        .interact_text()?;
    let kcal_per_100g = prompt_positive("Kibble kcal per 100 g", "350")?;
    let grams = prompt_non_negative("Kibble per day (g)", "0")?;

    Ok((Ingredient::energy_only(name, kcal_per_100g), grams))
}

/// Ingredients matching `input`: an exact (case-insensitive) match alone,
/// otherwise fuzzy candidates, best first.
pub fn match_ingredients<'a>(
    library: &'a [StoredIngredient],
    input: &str,
) -> Vec<&'a StoredIngredient> {
    let needle = input.trim().to_lowercase();

    if let Some(exact) = library
        .iter()
        .find(|s| s.ingredient.name.to_lowercase() == needle)
    {
        return vec![exact];
    }

    let mut candidates: Vec<(&StoredIngredient, f64)> = library
        .iter()
        .map(|s| (s, jaro_winkler(&s.ingredient.name.to_lowercase(), &needle)))
        .filter(|(_, score)| *score > FUZZY_MATCH_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    candidates
        .into_iter()
        .take(MAX_CANDIDATES)
        .map(|(s, _)| s)
        .collect()
}

/// Resolve typed text to a library ingredient, asking when unsure.
fn choose_ingredient(library: &[StoredIngredient], input: &str) -> Result<Option<Ingredient>> {
    let candidates = match_ingredients(library, input);

    match candidates.as_slice() {
        [] => Ok(None),
        [only] if only.ingredient.name.eq_ignore_ascii_case(input.trim()) => {
            Ok(Some(only.ingredient.clone()))
        }
        [only] => {
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}'?", only.ingredient.name))
                .default(true)
                .interact()?;
            Ok(confirm.then(|| only.ingredient.clone()))
        }
        many => {
            let mut options: Vec<String> =
                many.iter().map(|s| s.ingredient.name.clone()).collect();
            options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&options)
                .default(0)
                .interact()?;

            Ok(many.get(selection).map(|s| s.ingredient.clone()))
        }
    }
}

/// Prompt for recipe items until an empty name is entered.
///
/// Names are looked up in the stored library; unknown names can be entered
/// by hand with their energy density.
pub fn prompt_recipe(library: &[StoredIngredient]) -> Result<Recipe> {
    let mut items = Vec::new();

    loop {
        let input: String = Input::new()
            .with_prompt("Recipe ingredient (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            break;
        }

        let ingredient = match choose_ingredient(library, input)? {
            Some(ingredient) => ingredient,
            None => {
                if !prompt_yes_no(&format!("'{}' is not in the library. Enter it by hand?", input), true)? {
                    continue;
                }
                let kcal = prompt_positive(&format!("{} kcal per 100 g", input), "100")?;
                Ingredient::energy_only(input, kcal)
            }
        };

        let grams = prompt_non_negative(&format!("Grams of {} per day", ingredient.name), "100")?;
        println!("Added: {} ({:.0} g)", ingredient.name, grams);
        items.push(RecipeItem::new(ingredient, grams)?);
    }

    Ok(Recipe::new(items))
}

/// Prompt for meal names, comma separated.
pub fn prompt_meals() -> Result<Vec<String>> {
    let input: String = Input::new()
        .with_prompt("Meals (comma separated)")
        .default(DEFAULT_MEALS.join(","))
        .interact_text()?;

    Ok(parse_meals(&input))
}

fn parse_meals(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Collect a full plan request interactively.
pub fn collect_plan_request(library: &[StoredIngredient]) -> Result<ComputePlanRequest> {
    let dog = prompt_dog()?;
    let mer_factor_key = prompt_mer_factor(dog.neutered)?;
    let (kibble, kibble_grams) = prompt_kibble()?;
    let treats_kcal = prompt_non_negative("Treats per day (kcal)", "0")?;

    println!();
    if library.is_empty() {
        println!("Ingredient library is empty; enter recipe ingredients by hand.");
    } else {
        println!("{} ingredients in the library.", library.len());
    }
    let recipe = prompt_recipe(library)?;
    let meals = prompt_meals()?;
    let save = prompt_yes_no("Save the plan?", false)?;

    Ok(ComputePlanRequest {
        dog,
        mer_factor_key,
        kibble,
        kibble_grams,
        treats_kcal,
        recipe: Some(recipe),
        recipe_id: None,
        meals,
        save,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Vec<StoredIngredient> {
        ["Chicken breast", "Chicken liver", "Brown rice", "Pumpkin"]
            .iter()
            .enumerate()
            .map(|(i, name)| StoredIngredient {
                id: i as i64 + 1,
                ingredient: Ingredient::energy_only(*name, 100.0),
            })
            .collect()
    }

    #[test]
    fn test_exact_match_wins() {
        let lib = library();
        let matches = match_ingredients(&lib, "PUMPKIN");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].ingredient.name, "Pumpkin");
    }

    #[test]
    fn test_fuzzy_match_ranks_closest_first() {
        let lib = library();
        let matches = match_ingredients(&lib, "chicken brest");
        assert!(!matches.is_empty());
        assert_eq!(matches[0].ingredient.name, "Chicken breast");
    }

    #[test]
    fn test_no_match() {
        let lib = library();
        assert!(match_ingredients(&lib, "xyzzy").is_empty());
        assert!(match_ingredients(&[], "rice").is_empty());
    }

    #[test]
    fn test_parse_meals() {
        assert_eq!(
            parse_meals(" breakfast, lunch ,,dinner "),
            vec!["breakfast", "lunch", "dinner"]
        );
        assert!(parse_meals("").is_empty());
    }
}
