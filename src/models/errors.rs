use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ServiceError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::DatabaseError(_) | ServiceError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ServiceError::ValidationError(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::AuthenticationError(msg)
            | ServiceError::Forbidden(msg)
            | ServiceError::Conflict(msg) => msg.clone(),
            ServiceError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                "Database error occurred".to_string()
            }
            ServiceError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": message
        }))
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ServiceError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ServiceError::Conflict("A record with the same unique value already exists".to_string())
            }
            _ => ServiceError::DatabaseError(err.to_string()),
        }
    }
}

/// Raised when a stored or submitted label does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}
