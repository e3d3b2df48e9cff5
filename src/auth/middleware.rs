//! Authentication middleware for Axum
//!
//! Applied to every protected route. The request either reaches the
//! downstream handler carrying an [`AuthenticatedUser`] extension, or is
//! short-circuited with a 401 — no state survives the response.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::jwt::{verify_token, AuthError, JwtConfig};
use crate::api::error::ApiError;

/// State for the authentication middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Verified subject attached to the request for downstream handlers
#[derive(Clone, Copy, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

/// Extract the token from the Authorization header value.
///
/// The header carries the raw token; a `Bearer ` prefix is tolerated but
/// not required.
fn extract_token(auth_header: &str) -> &str {
    auth_header
        .strip_prefix("Bearer ")
        .unwrap_or(auth_header)
        .trim()
}

/// JWT authentication middleware - requires a valid token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // A header that is present but not valid UTF-8 is an invalid token,
    // not a missing one.
    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        None => return ApiError::from(AuthError::MissingToken).into_response(),
        Some(value) => match value.to_str() {
            Ok(value) => value.to_string(),
            Err(_) => return ApiError::from(AuthError::InvalidToken).into_response(),
        },
    };

    match verify_token(extract_token(&auth_header), &auth_state.jwt_config) {
        Ok(user_id) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser { user_id });
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
