use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::error::PlannerError;

impl PlannerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlannerError::InvalidArgument(_)
            | PlannerError::UnknownMerFactor { .. }
            | PlannerError::Json(_)
            | PlannerError::Csv(_) => StatusCode::BAD_REQUEST,
            PlannerError::NotFound(_) => StatusCode::NOT_FOUND,
            PlannerError::Conflict(_) => StatusCode::CONFLICT,
            PlannerError::Upstream(_) | PlannerError::Http(_) => StatusCode::BAD_GATEWAY,
            PlannerError::Config(_)
            | PlannerError::Io(_)
            | PlannerError::Prompt(_)
            | PlannerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            warn!("Request rejected: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for PlannerError {
    fn from(rejection: JsonRejection) -> Self {
        PlannerError::invalid(rejection.body_text())
    }
}

impl From<PathRejection> for PlannerError {
    fn from(rejection: PathRejection) -> Self {
        PlannerError::invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for PlannerError {
    fn from(rejection: QueryRejection) -> Self {
        PlannerError::invalid(rejection.body_text())
    }
}
