//! API error taxonomy and HTTP status mapping.
//!
//! Conflict-class errors (duplicate names) map to 400 rather than 409 to
//! match the wire contract the client was built against. Missing credentials
//! yield 401 while a bad or expired token yields 403; the status code is the
//! only distinguishing signal.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::services::auth::AuthError;
use crate::services::category::CategoryError;
use crate::services::event::EventError;
use crate::services::user::UserError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn access_denied() -> Self {
        ApiError::Forbidden("Access denied".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Internal details stay in the log, not on the wire.
            ApiError::Internal(err) => {
                log::error!("Internal error: {:#}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Validation(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidToken => ApiError::Forbidden(err.to_string()),
            AuthError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(_) | UserError::EmptyPassword => {
                ApiError::Validation(err.to_string())
            }
            UserError::Duplicate => ApiError::Conflict(err.to_string()),
            UserError::NotFound => ApiError::NotFound(err.to_string()),
            UserError::SuperAdminProtected => ApiError::Forbidden(err.to_string()),
            UserError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::Validation(_) | CategoryError::EmptyPatch => {
                ApiError::Validation(err.to_string())
            }
            CategoryError::DuplicateName => ApiError::Conflict(err.to_string()),
            CategoryError::NotFound => ApiError::NotFound(err.to_string()),
            CategoryError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl From<EventError> for ApiError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(_) => ApiError::Validation(err.to_string()),
            EventError::NotFound => ApiError::NotFound(err.to_string()),
            EventError::UnknownCategory => ApiError::Validation(err.to_string()),
            EventError::Internal(e) => ApiError::Internal(e),
        }
    }
}
