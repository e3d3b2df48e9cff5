//! API error taxonomy
//!
//! Every failure leaving a handler is converted to a JSON body
//! `{"error": true, "msg": "<description>"}` with the matching status
//! code. No partial responses, no retries.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::jwt::AuthError;

/// Тело ответа при любой ошибке
///
/// Все неуспешные ответы API имеют форму `{"error": true, "msg": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Всегда `true` для ошибок
    pub error: bool,
    /// Описание ошибки
    pub msg: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or invalid request body
    #[error("{0}")]
    BadRequest(String),

    /// Missing/invalid/expired token, or bad login credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Resource id absent (or soft-deleted)
    #[error("{0}")]
    NotFound(String),

    /// Duplicate username
    #[error("{0}")]
    Conflict(String),

    /// Storage or cryptographic failure
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: true,
            msg: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenCreation => Self::Internal(e.to_string()),
            other => Self::Unauthorized(other.to_string()),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        // The only unique constraint in the schema is users.username, so
        // a violation always means a duplicate registration.
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::Conflict("Username already exists".to_string())
            }
            _ => Self::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(ApiError::BadRequest(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized(String::new()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound(String::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict(String::new()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Internal(String::new()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map_to_unauthorized() {
        assert_eq!(
            ApiError::from(AuthError::ExpiredToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
        // Signing failure is an internal fault, not the caller's
        assert_eq!(
            ApiError::from(AuthError::TokenCreation).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
