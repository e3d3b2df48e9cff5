//! JWT token handling
//!
//! Tokens are signed with a symmetric HMAC secret (HS256). The verifier
//! pins the algorithm: a token declaring any other scheme (including
//! `none`) is rejected before its signature is even considered.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration, injected into issuer and verifier at construction.
/// The secret reaches this struct only through
/// [`AppConfig`](crate::config::AppConfig).
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
}

/// JWT claims: the subject identifier and an absolute expiry timestamp.
///
/// Deserialized once at verification time; a token with missing or
/// mis-typed fields never reaches a handler.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID, stringified)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, expiring `config.expiration_hours` from now
    pub fn new(user_id: i32, config: &JwtConfig) -> Self {
        let exp = Utc::now() + Duration::hours(config.expiration_hours);
        Self {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
        }
    }
}

/// Errors that can occur during authentication
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Unexpected signing algorithm")]
    InvalidAlgorithm,

    #[error("Malformed subject claim")]
    MalformedSubject,

    #[error("Failed to sign token")]
    TokenCreation,
}

/// Create a signed token for a user
pub fn create_token(user_id: i32, config: &JwtConfig) -> Result<String, AuthError> {
    let claims = Claims::new(user_id, config);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|_| AuthError::TokenCreation)
}

/// Verify a token and extract the subject user ID.
///
/// Checks, in order: declared algorithm is HS256, signature matches the
/// configured secret, expiry is in the future (no leeway), and the `sub`
/// claim parses as a user ID.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<i32, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            AuthError::InvalidAlgorithm
        }
        _ => AuthError::InvalidToken,
    })?;

    token_data
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| AuthError::MalformedSubject)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 24,
        }
    }

    fn encode_claims(claims: &Claims, secret: &str, alg: Algorithm) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn round_trip() {
        let config = test_config();
        let token = create_token(42, &config).unwrap();
        assert_eq!(verify_token(&token, &config), Ok(42));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = create_token(42, &config).unwrap();

        let other = JwtConfig {
            secret: "different-secret".to_string(),
            expiration_hours: 24,
        };
        assert_eq!(verify_token(&token, &other), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let claims = Claims {
            sub: "42".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode_claims(&claims, &config.secret, Algorithm::HS256);
        assert_eq!(verify_token(&token, &config), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn foreign_algorithm_is_rejected() {
        // Same claims, same secret, but signed with HS384: must fail even
        // though the signature itself is valid for that algorithm.
        let config = test_config();
        let claims = Claims::new(42, &config);
        let token = encode_claims(&claims, &config.secret, Algorithm::HS384);
        assert_eq!(verify_token(&token, &config), Err(AuthError::InvalidAlgorithm));
    }

    #[test]
    fn alg_none_is_rejected() {
        let config = test_config();
        let valid = create_token(42, &config).unwrap();
        let payload = valid.split('.').nth(1).unwrap();

        // base64url of {"alg":"none","typ":"JWT"} with an empty signature
        let token = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{payload}.");
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let config = test_config();
        let token = create_token(42, &config).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();

        assert!(verify_token(&parts.join("."), &config).is_err());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let config = test_config();
        let token = create_token(42, &config).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut sig: Vec<u8> = parts[2].clone().into_bytes();
        // flip a character in the middle, where every base64 bit counts
        sig[10] = if sig[10] == b'A' { b'B' } else { b'A' };
        parts[2] = String::from_utf8(sig).unwrap();

        assert!(verify_token(&parts.join("."), &config).is_err());
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let config = test_config();
        let claims = Claims {
            sub: "not-a-user-id".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode_claims(&claims, &config.secret, Algorithm::HS256);
        assert_eq!(verify_token(&token, &config), Err(AuthError::MalformedSubject));
    }

    #[test]
    fn missing_exp_is_rejected() {
        #[derive(Serialize)]
        struct NoExp {
            sub: String,
        }

        let config = test_config();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoExp {
                sub: "42".to_string(),
            },
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let config = test_config();
        assert_eq!(
            verify_token("definitely-not-a-jwt", &config),
            Err(AuthError::InvalidToken)
        );
    }
}
