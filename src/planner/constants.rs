use std::collections::HashMap;
use std::sync::LazyLock;

/// Coefficient of the RER formula (kcal per kg^0.75).
pub const RER_MULTIPLIER: f64 = 70.0;

/// Metabolic body-weight exponent of the RER formula.
pub const RER_EXPONENT: f64 = 0.75;

/// Nutrient totals are compared against standards on this energy basis.
pub const KCAL_BASIS: f64 = 1000.0;

/// Ingredient densities and recipe quantities are expressed per this many grams.
pub const GRAMS_BASIS: f64 = 100.0;

/// Meals used when a request does not name any.
pub const DEFAULT_MEALS: [&str; 2] = ["breakfast", "dinner"];

/// Jaro-Winkler score above which an unknown key gets a suggestion.
pub const SUGGESTION_THRESHOLD: f64 = 0.8;

// ─────────────────────────────────────────────────────────────────────────────
// MER factors (life stage / goal multipliers applied to RER)
// ─────────────────────────────────────────────────────────────────────────────

/// Factor keys in display order.
pub const MER_FACTOR_KEYS: [&str; 6] = [
    "neutered_adult",
    "intact_adult",
    "weight_loss",
    "weight_gain",
    "puppy_low",
    "puppy_high",
];

/// Map from factor key to multiplier.
pub static MER_FACTORS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("neutered_adult", 1.6);
    m.insert("intact_adult", 1.8);
    m.insert("weight_loss", 1.1);
    m.insert("weight_gain", 1.8);
    m.insert("puppy_low", 2.0);
    m.insert("puppy_high", 3.0);
    m
});

/// Map from factor key to human-readable description.
pub static MER_FACTOR_NAMES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();
        m.insert("neutered_adult", "neutered adult");
        m.insert("intact_adult", "intact adult");
        m.insert("weight_loss", "weight loss");
        m.insert("weight_gain", "weight gain");
        m.insert("puppy_low", "puppy (low)");
        m.insert("puppy_high", "puppy (high)");
        m
    });

/// Get the description for a factor key.
pub fn mer_factor_name(key: &str) -> &'static str {
    MER_FACTOR_NAMES.get(key).copied().unwrap_or("unknown")
}

/// Factor keys paired with their multipliers, in display order.
pub fn mer_factor_table() -> Vec<(&'static str, f64)> {
    MER_FACTOR_KEYS
        .iter()
        .filter_map(|key| MER_FACTORS.get(key).map(|factor| (*key, *factor)))
        .collect()
}
