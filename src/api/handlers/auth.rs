//! Authentication API handlers
//!
//! Thin orchestration over the password hasher, the credential store and
//! the token issuer. Login deliberately collapses "unknown user" and
//! "wrong password" into one identical response.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::extract::ValidatedJson;
use crate::auth::jwt::{create_token, JwtConfig};
use crate::auth::password::{hash_password, verify_password};
use crate::infrastructure::database::entities::user;

/// Single message for every credential failure, so a caller cannot tell
/// an unknown username from a wrong password.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// State for authentication handlers
#[derive(Clone)]
pub struct AuthHandlerState {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
}

/// Запрос на регистрацию нового пользователя
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "username": "alice",
    "password": "secret1"
}))]
pub struct RegisterRequest {
    /// Имя пользователя (уникальное)
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    /// Пароль
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Запрос на авторизацию
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "username": "alice",
    "password": "secret1"
}))]
pub struct LoginRequest {
    /// Имя пользователя
    pub username: String,
    /// Пароль
    pub password: String,
}

/// Информация о пользователе
///
/// Хэш пароля в ответ не включается.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// Уникальный идентификатор пользователя
    pub id: i32,
    /// Имя пользователя
    pub username: String,
    /// Дата создания
    pub created_at: DateTime<Utc>,
    /// Дата последнего обновления
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Ответ на успешную авторизацию
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Подписанный JWT-токен. Передавайте в заголовке `Authorization`
    pub token: String,
}

/// Регистрация нового пользователя
///
/// Имя пользователя должно быть уникальным. Пароль хранится только в
/// виде bcrypt-хэша и в ответ не включается.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Пользователь успешно создан", body = UserResponse),
        (status = 400, description = "Невалидное тело запроса", body = ErrorBody),
        (status = 409, description = "Имя пользователя уже занято", body = ErrorBody),
        (status = 500, description = "Внутренняя ошибка", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let password_hash =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let now = Utc::now();
    let new_user = user::ActiveModel {
        username: Set(request.username),
        password_hash: Set(password_hash),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    // A concurrent registration with the same username races at the
    // unique index; the loser surfaces here as Conflict.
    let created = new_user.insert(&state.db).await?;

    Ok(Json(UserResponse::from(created)))
}

/// Авторизация пользователя
///
/// Возвращает JWT-токен при успешной аутентификации. Токен действует
/// 24 часа (настраивается) и передаётся в заголовке `Authorization`.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Успешная авторизация", body = TokenResponse),
        (status = 400, description = "Невалидное тело запроса", body = ErrorBody),
        (status = 401, description = "Неверные учётные данные", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(&request.username))
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?;

    let Some(user) = user else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let password_valid = verify_password(&request.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = create_token(user.id, &state.jwt_config)?;

    Ok(Json(TokenResponse { token }))
}
