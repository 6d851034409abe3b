use assert_float_eq::*;

use dog_meal_planner_rs::PlannerError;
use dog_meal_planner_rs::planner::{
    MER_FACTOR_KEYS, calories_to_grams, compute_mer, compute_rer, grams_to_calories, mer_factor,
    mer_factor_table,
};

#[test]
fn test_rer_reference_weights() {
    assert_float_absolute_eq!(compute_rer(1.0).unwrap(), 70.0, 1e-9);
    assert_float_absolute_eq!(compute_rer(10.0).unwrap(), 393.65, 0.05);
    assert_float_absolute_eq!(compute_rer(30.0).unwrap(), 897.3, 0.1);
}

#[test]
fn test_rer_rejects_non_positive_weight() {
    for weight in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            compute_rer(weight),
            Err(PlannerError::InvalidArgument(_))
        ));
    }
}

#[test]
fn test_rer_is_monotonic() {
    let mut previous = 0.0;
    for step in 1..200 {
        let rer = compute_rer(step as f64 * 0.5).unwrap();
        assert!(rer > previous);
        previous = rer;
    }
}

#[test]
fn test_mer_scales_rer() {
    let rer = compute_rer(10.0).unwrap();
    assert_float_absolute_eq!(compute_mer(rer, 1.6), 629.84, 0.1);
    assert_float_absolute_eq!(compute_mer(rer, 1.0), rer, 1e-12);
}

#[test]
fn test_factor_table() {
    let table = mer_factor_table();
    assert_eq!(table.len(), MER_FACTOR_KEYS.len());
    assert_eq!(mer_factor("neutered_adult").unwrap(), 1.6);
    assert_eq!(mer_factor("intact_adult").unwrap(), 1.8);
    assert_eq!(mer_factor("weight_loss").unwrap(), 1.1);
    assert_eq!(mer_factor("weight_gain").unwrap(), 1.8);
    assert_eq!(mer_factor("puppy_low").unwrap(), 2.0);
    assert_eq!(mer_factor("puppy_high").unwrap(), 3.0);
}

#[test]
fn test_unknown_factor_suggests_closest_key() {
    let err = mer_factor("neuterd_adult").unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(
        err.to_string(),
        "Unknown mer_factor_key: neuterd_adult (did you mean 'neutered_adult'?)"
    );

    let err = mer_factor("zzz").unwrap_err();
    assert!(matches!(
        err,
        PlannerError::UnknownMerFactor {
            suggestion: None,
            ..
        }
    ));
}

#[test]
fn test_conversions_round_trip() {
    for density in [26.0, 130.0, 165.0, 350.0, 902.0] {
        for grams in [1.0, 37.5, 100.0, 250.0] {
            let kcal = grams_to_calories(grams, density).unwrap();
            assert_float_relative_eq!(calories_to_grams(kcal, density).unwrap(), grams, 1e-12);
        }
    }
    assert_float_absolute_eq!(grams_to_calories(100.0, 350.0).unwrap(), 350.0, 1e-9);
    assert_float_absolute_eq!(calories_to_grams(350.0, 350.0).unwrap(), 100.0, 1e-9);
}

#[test]
fn test_conversion_guards() {
    assert!(grams_to_calories(-1.0, 100.0).is_err());
    assert_eq!(grams_to_calories(0.0, 100.0).unwrap(), 0.0);
    assert!(calories_to_grams(100.0, 0.0).is_err());
    assert!(calories_to_grams(100.0, -50.0).is_err());
}
