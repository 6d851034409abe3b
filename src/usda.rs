//! USDA FoodData Central client.
//!
//! Fetches a food by FDC id and maps the provider's nutrient names onto the
//! fixed [`Nutrients`] fields. Names outside the mapping are ignored, so a
//! food missing e.g. vitamin D data simply reports zero for it.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::models::{Ingredient, NutrientField, Nutrients};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider nutrient name (lowercased) to the field it fills.
const NUTRIENT_NAMES: [(&str, NutrientField); 11] = [
    ("energy", NutrientField::Kcal),
    ("protein", NutrientField::ProteinG),
    ("total lipid (fat)", NutrientField::FatG),
    ("carbohydrate, by difference", NutrientField::CarbsG),
    ("calcium, ca", NutrientField::CalciumMg),
    ("phosphorus, p", NutrientField::PhosphorusMg),
    ("iron, fe", NutrientField::IronMg),
    ("zinc, zn", NutrientField::ZincMg),
    ("vitamin a, iu", NutrientField::VitaminAIu),
    ("vitamin d (d2 + d3)", NutrientField::VitaminDIu),
    ("vitamin e (alpha-tocopherol)", NutrientField::VitaminEMg),
];

/// A food as reported by FoodData Central, already mapped onto our fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsdaFood {
    pub fdc_id: u64,
    pub description: String,
    pub nutrients_per_100g: Nutrients,
    pub kcal_per_100g: f64,
}

/// Raw `/food/{fdcId}` payload (only the parts we read).
#[derive(Debug, Deserialize)]
pub struct FoodResponse {
    #[serde(rename = "fdcId")]
    pub fdc_id: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "foodNutrients", default)]
    pub food_nutrients: Vec<FoodNutrientResponse>,
}

#[derive(Debug, Deserialize)]
pub struct FoodNutrientResponse {
    #[serde(default)]
    pub nutrient: Option<NutrientInfo>,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct NutrientInfo {
    pub name: String,
    #[serde(rename = "unitName", default)]
    pub unit_name: Option<String>,
}

/// Map a raw payload onto [`UsdaFood`].
///
/// Energy is reported both in kcal and kJ under the same name; the kcal
/// entry wins whenever units are present.
pub fn parse_food(payload: FoodResponse) -> UsdaFood {
    let lookup: HashMap<&str, NutrientField> = NUTRIENT_NAMES.into_iter().collect();
    let mut nutrients = Nutrients::ZERO;
    let mut energy_from_kcal = false;

    for entry in payload.food_nutrients {
        let (Some(info), Some(amount)) = (entry.nutrient, entry.amount) else {
            continue;
        };
        let name = info.name.to_lowercase();
        let Some(&field) = lookup.get(name.as_str()) else {
            continue;
        };

        if field == NutrientField::Kcal {
            let is_kcal = info
                .unit_name
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case("kcal"));
            let is_other_unit = info.unit_name.is_some() && !is_kcal;
            if is_other_unit || (energy_from_kcal && !is_kcal) {
                continue;
            }
            energy_from_kcal |= is_kcal;
        }

        nutrients.set(field, amount);
    }

    UsdaFood {
        fdc_id: payload.fdc_id,
        description: payload
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string()),
        kcal_per_100g: nutrients.kcal,
        nutrients_per_100g: nutrients,
    }
}

/// Build an ingredient from a USDA food, optionally renamed.
pub fn ingredient_from_usda(food: &UsdaFood, name_override: Option<&str>) -> Ingredient {
    let name = name_override
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(food.description.as_str());
    Ingredient::new(name, food.kcal_per_100g, food.nutrients_per_100g)
}

/// Async HTTP client for FoodData Central.
pub struct UsdaClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl UsdaClient {
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Fetch one food by FDC id.
    pub async fn fetch_food(&self, fdc_id: u64) -> Result<UsdaFood> {
        let url = format!("{}/food/{fdc_id}", self.base_url);
        info!(fdc_id, "Fetching food from USDA");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PlannerError::NotFound(format!("USDA food {fdc_id}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::Upstream(format!("USDA API HTTP {status}: {body}")));
        }

        let payload: FoodResponse = response.json().await?;
        let food = parse_food(payload);
        debug!(fdc_id, description = %food.description, kcal = food.kcal_per_100g, "Parsed USDA food");
        Ok(food)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHICKEN_FIXTURE: &str = r#"{
        "fdcId": 171477,
        "description": "Chicken, broilers or fryers, breast, meat only, cooked, roasted",
        "foodNutrients": [
            {"nutrient": {"id": 1003, "name": "Protein", "unitName": "g"}, "amount": 31.02},
            {"nutrient": {"id": 1004, "name": "Total lipid (fat)", "unitName": "g"}, "amount": 3.57},
            {"nutrient": {"id": 1008, "name": "Energy", "unitName": "kcal"}, "amount": 165},
            {"nutrient": {"id": 1062, "name": "Energy", "unitName": "kJ"}, "amount": 690},
            {"nutrient": {"id": 1087, "name": "Calcium, Ca", "unitName": "mg"}, "amount": 15},
            {"nutrient": {"id": 1093, "name": "Sodium, Na", "unitName": "mg"}, "amount": 74},
            {"nutrient": {"id": 1095, "name": "Zinc, Zn", "unitName": "mg"}},
            {"amount": 12}
        ]
    }"#;

    #[test]
    fn test_parse_food_maps_known_names() {
        let payload: FoodResponse = serde_json::from_str(CHICKEN_FIXTURE).unwrap();
        let food = parse_food(payload);

        assert_eq!(food.fdc_id, 171477);
        assert_eq!(food.kcal_per_100g, 165.0);
        assert_eq!(food.nutrients_per_100g.kcal, 165.0);
        assert_eq!(food.nutrients_per_100g.protein_g, 31.02);
        assert_eq!(food.nutrients_per_100g.fat_g, 3.57);
        assert_eq!(food.nutrients_per_100g.calcium_mg, 15.0);
        // No amount, unknown name, or no nutrient info: left at zero
        assert_eq!(food.nutrients_per_100g.zinc_mg, 0.0);
        assert_eq!(food.nutrients_per_100g.vitamin_d_iu, 0.0);
    }

    #[test]
    fn test_parse_food_without_units_takes_last_energy() {
        let json = r#"{
            "fdcId": 1,
            "foodNutrients": [
                {"nutrient": {"name": "Energy"}, "amount": 100},
                {"nutrient": {"name": "ENERGY"}, "amount": 120}
            ]
        }"#;
        let food = parse_food(serde_json::from_str(json).unwrap());
        assert_eq!(food.kcal_per_100g, 120.0);
        assert_eq!(food.description, "unknown");
    }

    #[test]
    fn test_ingredient_from_usda_name_override() {
        let payload: FoodResponse = serde_json::from_str(CHICKEN_FIXTURE).unwrap();
        let food = parse_food(payload);

        let default_name = ingredient_from_usda(&food, None);
        assert_eq!(default_name.name, food.description);

        let renamed = ingredient_from_usda(&food, Some("Chicken breast"));
        assert_eq!(renamed.name, "Chicken breast");
        assert_eq!(renamed.kcal_per_100g, 165.0);
        assert_eq!(renamed.nutrients_per_100g.protein_g, 31.02);
    }

    mod client {
        use std::collections::HashMap;

        use axum::{
            Router,
            extract::{Path, Query},
            http::{StatusCode, header::CONTENT_TYPE},
            response::{IntoResponse, Response},
            routing::get,
        };
        use tokio::net::TcpListener;

        use super::CHICKEN_FIXTURE;
        use crate::error::PlannerError;
        use crate::usda::UsdaClient;

        const API_KEY: &str = "test-key";

        async fn food(
            Path(fdc_id): Path<u64>,
            Query(params): Query<HashMap<String, String>>,
        ) -> Response {
            if params.get("api_key").map(String::as_str) != Some(API_KEY) {
                return (StatusCode::FORBIDDEN, "bad key").into_response();
            }
            match fdc_id {
                171477 => ([(CONTENT_TYPE, "application/json")], CHICKEN_FIXTURE).into_response(),
                503 => (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response(),
                _ => StatusCode::NOT_FOUND.into_response(),
            }
        }

        /// FoodData Central stand-in on an ephemeral local port.
        async fn fake_fdc() -> String {
            let app = Router::new().route("/food/:fdc_id", get(food));
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let address = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{address}/")
        }

        #[tokio::test]
        async fn test_fetch_food_parses_success() {
            let client = UsdaClient::with_base_url(API_KEY, fake_fdc().await).unwrap();
            let food = client.fetch_food(171477).await.unwrap();
            assert_eq!(food.fdc_id, 171477);
            assert_eq!(food.kcal_per_100g, 165.0);
            assert_eq!(food.nutrients_per_100g.protein_g, 31.02);
        }

        #[tokio::test]
        async fn test_fetch_food_missing_is_not_found() {
            let client = UsdaClient::with_base_url(API_KEY, fake_fdc().await).unwrap();
            let err = client.fetch_food(42).await.unwrap_err();
            assert!(matches!(err, PlannerError::NotFound(_)));
        }

        #[tokio::test]
        async fn test_fetch_food_server_error_is_upstream() {
            let client = UsdaClient::with_base_url(API_KEY, fake_fdc().await).unwrap();
            match client.fetch_food(503).await {
                Err(PlannerError::Upstream(message)) => {
                    assert!(message.contains("503"));
                    assert!(message.contains("maintenance"));
                }
                other => panic!("expected upstream error, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_fetch_food_sends_api_key() {
            let client = UsdaClient::with_base_url("wrong-key", fake_fdc().await).unwrap();
            let err = client.fetch_food(171477).await.unwrap_err();
            assert!(matches!(err, PlannerError::Upstream(message) if message.contains("403")));
        }
    }
}
