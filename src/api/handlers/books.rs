//! Book REST API handlers
//!
//! Every route here sits behind the authentication middleware; handlers
//! only run once a verified subject is attached to the request.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::extract::{ValidatedJson, ValidatedJsonRejection};
use crate::auth::middleware::AuthenticatedUser;
use crate::infrastructure::database::entities::book;

/// State for book handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

/// Книга
#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    /// Уникальный ID книги
    pub id: i32,
    /// Название
    pub title: String,
    /// Автор
    pub author: String,
    /// Оценка
    pub rating: i32,
    /// Дата создания
    pub created_at: DateTime<Utc>,
    /// Дата последнего обновления
    pub updated_at: DateTime<Utc>,
}

impl From<book::Model> for BookResponse {
    fn from(b: book::Model) -> Self {
        Self {
            id: b.id,
            title: b.title,
            author: b.author,
            rating: b.rating,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Тело запроса на создание или обновление книги
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "title": "The Name of the Wind",
    "author": "Patrick Rothfuss",
    "rating": 5
}))]
pub struct BookPayload {
    /// Название
    pub title: String,
    /// Автор
    pub author: String,
    /// Оценка
    pub rating: i32,
}

/// Ответ операции удаления
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Текст подтверждения
    pub message: String,
}

fn not_found(id: i32) -> ApiError {
    ApiError::NotFound(format!("Book with ID {} not found", id))
}

/// Lookup that treats soft-deleted rows as absent.
async fn find_book(db: &DatabaseConnection, id: i32) -> Result<book::Model, ApiError> {
    book::Entity::find_by_id(id)
        .filter(book::Column::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Список всех книг
#[utoipa::path(
    get,
    path = "/books",
    tag = "Books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Список книг", body = [BookResponse]),
        (status = 401, description = "Не авторизован", body = ErrorBody)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = book::Entity::find()
        .filter(book::Column::DeletedAt.is_null())
        .order_by_asc(book::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Создание книги
#[utoipa::path(
    post,
    path = "/books",
    tag = "Books",
    security(("bearer_auth" = [])),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Книга создана", body = BookResponse),
        (status = 400, description = "Невалидное тело запроса", body = ErrorBody),
        (status = 401, description = "Не авторизован", body = ErrorBody),
        (status = 500, description = "Внутренняя ошибка", body = ErrorBody)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<BookPayload>,
) -> Result<Json<BookResponse>, ApiError> {
    debug!(user_id = user.user_id, title = %payload.title, "creating book");

    let now = Utc::now();
    let new_book = book::ActiveModel {
        title: Set(payload.title),
        author: Set(payload.author),
        rating: Set(payload.rating),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let created = new_book.insert(&state.db).await?;

    Ok(Json(BookResponse::from(created)))
}

/// Получение книги по ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "ID книги")
    ),
    responses(
        (status = 200, description = "Книга", body = BookResponse),
        (status = 401, description = "Не авторизован", body = ErrorBody),
        (status = 404, description = "Книга не найдена", body = ErrorBody)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = find_book(&state.db, id).await?;
    Ok(Json(BookResponse::from(book)))
}

/// Обновление книги
///
/// Заменяет название, автора и оценку целиком.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "ID книги")
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Книга обновлена", body = BookResponse),
        (status = 400, description = "Невалидное тело запроса", body = ErrorBody),
        (status = 401, description = "Не авторизован", body = ErrorBody),
        (status = 404, description = "Книга не найдена", body = ErrorBody),
        (status = 500, description = "Внутренняя ошибка", body = ErrorBody)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<ValidatedJson<BookPayload>, ValidatedJsonRejection>,
) -> Result<Json<BookResponse>, ApiError> {
    // An unknown id wins over a malformed body: 404 before 400.
    let existing = find_book(&state.db, id).await?;
    let ValidatedJson(payload) = payload?;

    let mut active: book::ActiveModel = existing.into();
    active.title = Set(payload.title);
    active.author = Set(payload.author);
    active.rating = Set(payload.rating);
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    Ok(Json(BookResponse::from(updated)))
}

/// Удаление книги
///
/// Мягкое удаление: строка остаётся в таблице с заполненным
/// `deleted_at` и перестаёт возвращаться из всех запросов.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "ID книги")
    ),
    responses(
        (status = 200, description = "Книга удалена", body = MessageResponse),
        (status = 401, description = "Не авторизован", body = ErrorBody),
        (status = 404, description = "Книга не найдена", body = ErrorBody),
        (status = 500, description = "Внутренняя ошибка", body = ErrorBody)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let existing = find_book(&state.db, id).await?;

    let mut active: book::ActiveModel = existing.into();
    active.deleted_at = Set(Some(Utc::now()));
    active.update(&state.db).await?;

    Ok(Json(MessageResponse {
        message: format!("Book with ID {} deleted successfully", id),
    }))
}
