use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// JSON error envelope returned by the machine routes.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{} not found", entity)))
    }

    pub fn invalid_fields(fields: &[&str]) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            Some(format!("invalid fields: {}", fields.join(", "))),
        )
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.title, "detail": self.detail});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(_) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()))
            }
            ServiceError::Model(models::errors::ModelError::Validation(_)) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()))
            }
            ServiceError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string()))
            }
            _ => {
                error!(err = %e, "service call failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string()))
            }
        }
    }
}
