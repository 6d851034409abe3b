use std::collections::BTreeMap;

use assert_float_eq::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use dog_meal_planner_rs::planner::{
    PlanInputs, compute_meal_plan, compute_meal_plan_default, split_recipe_by_meals,
};
use dog_meal_planner_rs::standards::{NutrientStandard, StandardsTable};
use dog_meal_planner_rs::{Dog, Ingredient, NutrientField, Nutrients, Recipe, RecipeItem};

fn dog(weight_kg: f64) -> Dog {
    Dog {
        weight_kg,
        target_weight_kg: None,
        age_years: 4.0,
        sex: "female".to_string(),
        neutered: true,
        activity: "normal".to_string(),
    }
}

fn chicken() -> Ingredient {
    Ingredient::new(
        "chicken",
        165.0,
        Nutrients {
            protein_g: 31.0,
            ..Nutrients::ZERO
        },
    )
}

fn reference_inputs() -> PlanInputs {
    PlanInputs {
        dog: dog(10.0),
        mer_factor: 1.6,
        kibble: Ingredient::energy_only("kibble", 350.0),
        kibble_grams: 100.0,
        treats_kcal: 50.0,
        recipe: Recipe::new(vec![RecipeItem::new(chicken(), 200.0).unwrap()]),
        meals: PlanInputs::default_meals(),
    }
}

#[test]
fn test_reference_plan() {
    let plan = compute_meal_plan_default(&reference_inputs()).unwrap();

    assert_float_absolute_eq!(plan.target_kcal, 629.84, 0.1);
    assert_float_absolute_eq!(plan.kibble_kcal, 350.0, 1e-9);
    assert_float_absolute_eq!(plan.treats_kcal, 50.0, 1e-9);
    assert_float_absolute_eq!(plan.total_kcal, 730.0, 1e-9);
    assert_float_absolute_eq!(plan.homemade_kcal_budget, 229.84, 0.1);

    assert_float_absolute_eq!(plan.nutrients_total.kcal, 730.0, 1e-9);
    assert_float_absolute_eq!(plan.nutrients_total.protein_g, 62.0, 1e-9);
    assert_float_absolute_eq!(plan.nutrients_per_1000_kcal.kcal, 1000.0, 1e-9);
    assert_float_absolute_eq!(plan.nutrients_per_1000_kcal.protein_g, 84.93, 0.01);

    // Protein clears the default minimum; the chicken carries no fat.
    assert!(!plan.aafco_warnings.contains_key("protein_g"));
    assert!(plan.aafco_warnings.contains_key("fat_g"));

    assert_eq!(plan.per_meal_grams.len(), 2);
    assert_float_absolute_eq!(plan.per_meal_grams["breakfast"], 100.0, 1e-9);
    assert_float_absolute_eq!(plan.per_meal_grams["dinner"], 100.0, 1e-9);
}

#[test]
fn test_meal_split_three_meals() {
    let recipe = Recipe::new(vec![
        RecipeItem::new(chicken(), 150.0).unwrap(),
        RecipeItem::new(Ingredient::energy_only("rice", 130.0), 150.0).unwrap(),
    ]);
    let meals: Vec<String> = ["breakfast", "lunch", "dinner"]
        .iter()
        .map(|m| m.to_string())
        .collect();

    let split = split_recipe_by_meals(&recipe, &meals);
    assert_eq!(split.len(), 3);
    for grams in split.values() {
        assert_float_absolute_eq!(*grams, 100.0, 1e-9);
    }
}

#[test]
fn test_budget_never_negative() {
    for kibble_grams in [0.0, 50.0, 200.0, 1000.0, 5000.0] {
        let mut inputs = reference_inputs();
        inputs.kibble_grams = kibble_grams;
        let plan = compute_meal_plan_default(&inputs).unwrap();
        assert!(plan.homemade_kcal_budget >= 0.0);
        assert_float_absolute_eq!(
            plan.homemade_kcal_budget,
            (plan.target_kcal - plan.kibble_kcal - plan.treats_kcal).max(0.0),
            1e-9
        );
    }
}

#[test]
fn test_recipe_totals_ignore_item_order() {
    let mut items = vec![
        RecipeItem::new(chicken(), 180.0).unwrap(),
        RecipeItem::new(
            Ingredient::new(
                "liver",
                135.0,
                Nutrients {
                    protein_g: 20.4,
                    fat_g: 3.6,
                    iron_mg: 6.5,
                    vitamin_a_iu: 16899.0,
                    ..Nutrients::ZERO
                },
            ),
            40.0,
        )
        .unwrap(),
        RecipeItem::new(
            Ingredient::new(
                "pumpkin",
                26.0,
                Nutrients {
                    carbs_g: 6.5,
                    calcium_mg: 21.0,
                    ..Nutrients::ZERO
                },
            ),
            75.0,
        )
        .unwrap(),
        RecipeItem::new(Ingredient::energy_only("rice", 130.0), 120.0).unwrap(),
    ];
    let expected = Recipe::new(items.clone()).total_nutrients();

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        items.shuffle(&mut rng);
        let totals = Recipe::new(items.clone()).total_nutrients();
        for field in NutrientField::ALL {
            assert_float_absolute_eq!(totals.get(field), expected.get(field), 1e-9);
        }
    }
}

#[test]
fn test_item_energy_comes_from_density() {
    // The per-100 g vector's own kcal is overridden by kcal_per_100g.
    let odd = Ingredient::new(
        "odd",
        200.0,
        Nutrients {
            kcal: 999.0,
            ..Nutrients::ZERO
        },
    );
    let recipe = Recipe::new(vec![RecipeItem::new(odd, 50.0).unwrap()]);
    assert_float_absolute_eq!(recipe.total_nutrients().kcal, 100.0, 1e-9);
}

#[test]
fn test_zero_energy_plan_has_zero_normalized_vector() {
    let inputs = PlanInputs {
        kibble_grams: 0.0,
        treats_kcal: 0.0,
        recipe: Recipe::default(),
        meals: Vec::new(),
        ..reference_inputs()
    };
    let plan = compute_meal_plan_default(&inputs).unwrap();

    assert_eq!(plan.total_kcal, 0.0);
    assert_eq!(plan.nutrients_per_1000_kcal, Nutrients::ZERO);
    assert!(plan.per_meal_grams.is_empty());
}

#[test]
fn test_custom_standards_table() {
    let mut standards = StandardsTable::empty();
    let plan = compute_meal_plan(&reference_inputs(), &standards).unwrap();
    assert!(plan.aafco_warnings.is_empty());

    standards.set(
        NutrientField::ProteinG,
        NutrientStandard::new("protein", 90.0, "g"),
    );
    let plan = compute_meal_plan(&reference_inputs(), &standards).unwrap();

    let expected: BTreeMap<String, String> = [(
        "protein_g".to_string(),
        "protein below minimum: 84.93g < 90.0g".to_string(),
    )]
    .into_iter()
    .collect();
    assert_eq!(plan.aafco_warnings, expected);
}

#[test]
fn test_failures_are_all_or_nothing() {
    let mut inputs = reference_inputs();
    inputs.dog = dog(-1.0);
    assert!(compute_meal_plan_default(&inputs).is_err());

    let mut inputs = reference_inputs();
    inputs.recipe.items.push(RecipeItem {
        ingredient: chicken(),
        grams: -5.0,
    });
    let err = compute_meal_plan_default(&inputs).unwrap_err();
    assert!(err.is_invalid_argument());
}
