use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown mer_factor_key: {key}{}", suggestion_suffix(.suggestion))]
    UnknownMerFactor {
        key: String,
        suggestion: Option<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl PlannerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PlannerError::InvalidArgument(message.into())
    }

    /// True for errors caused by caller input rather than the environment.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            PlannerError::InvalidArgument(_) | PlannerError::UnknownMerFactor { .. }
        )
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
