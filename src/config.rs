use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::error::{PlannerError, Result};

pub const DEFAULT_PORT: &str = "8000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://dog_meal_planner.db";
pub const DEFAULT_USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub usda_base_url: String,
    /// Used for USDA lookups when a request does not carry its own key.
    pub usda_api_key: Option<String>,
    /// JSON file overriding the default nutrient minimums.
    pub standards_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("PLANNER_PORT", DEFAULT_PORT)?,
            database_url: try_load("DATABASE_URL", DEFAULT_DATABASE_URL)?,
            usda_base_url: try_load("USDA_BASE_URL", DEFAULT_USDA_BASE_URL)?,
            usda_api_key: optional("USDA_API_KEY"),
            standards_path: optional("STANDARDS_PATH").map(PathBuf::from),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            usda_base_url: DEFAULT_USDA_BASE_URL.to_string(),
            usda_api_key: None,
            standards_path: None,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn optional(key: &str) -> Option<String> {
    let value = var(key);
    if value.is_none() {
        info!("{key} not set");
    }
    value
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            PlannerError::Config(format!("invalid {key}: {e}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_default() {
        let port: u16 = try_load("PLANNER_TEST_UNSET_PORT", "1234").unwrap();
        assert_eq!(port, 1234);
    }

    #[test]
    fn test_try_load_invalid_default() {
        let result: Result<u16> = try_load("PLANNER_TEST_UNSET_PORT", "not-a-port");
        assert!(matches!(result, Err(PlannerError::Config(_))));
    }
}
