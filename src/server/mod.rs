//! HTTP API.
//!
//! Stateless calculator endpoints (`/compute-plan`, `/rer`, ...) plus CRUD
//! over stored ingredients, recipes and plans. Errors are returned as
//! `{"error": "..."}` with a status derived from [`PlannerError`].
//!
//! [`PlannerError`]: crate::error::PlannerError

mod error;
mod extract;
pub mod payloads;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use routes::*;
pub use state::AppState;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/compute-plan", post(compute_plan_handler))
        .route("/ingredient/from-usda", post(usda_ingredient_handler))
        .route("/ingredient/manual", post(manual_ingredient_handler))
        .route("/recipe", post(recipe_totals_handler))
        .route("/rer/:weight_kg", get(rer_handler))
        .route("/kcal-to-grams", get(kcal_to_grams_handler))
        .route("/mer-factors", get(mer_factors_handler))
        .route("/standards", get(standards_handler))
        .route(
            "/ingredients",
            get(list_ingredients_handler).post(create_ingredient_handler),
        )
        .route(
            "/ingredients/:id",
            get(get_ingredient_handler).delete(delete_ingredient_handler),
        )
        .route(
            "/recipes",
            get(list_recipes_handler).post(create_recipe_handler),
        )
        .route(
            "/recipes/:id",
            get(get_recipe_handler).delete(delete_recipe_handler),
        )
        .route("/plans", get(list_plans_handler))
        .route("/plans/:id", get(get_plan_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<()> {
    info!("Initializing state...");
    let address = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(config).await?;

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
