use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use depot_fulfillment::RegistryError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { .. } => AppError::NotFoundError(err.to_string()),
            RegistryError::Validation(_) | RegistryError::PickRecord(_) => AppError::ValidationError(err.to_string()),
            RegistryError::Transition(_) | RegistryError::NotPicking(_) => AppError::ConflictError(err.to_string()),
            RegistryError::Repository(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}
