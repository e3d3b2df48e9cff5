//! API Router with Swagger UI

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::error::ErrorBody;
use crate::api::handlers::{auth, books, health};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{auth_middleware, AuthState};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token, raw or Bearer-prefixed"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            // Common
            ErrorBody,
            health::HealthResponse,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::UserResponse,
            auth::TokenResponse,
            // Books
            books::BookResponse,
            books::BookPayload,
            books::MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Проверка состояния сервера. Используйте для health-check мониторинга."),
        (name = "Authentication", description = "Регистрация и вход. Токен возвращается в поле `token` и передаётся в заголовке `Authorization` (префикс `Bearer` не обязателен)."),
        (name = "Books", description = "CRUD-операции над каталогом книг. Все маршруты требуют валидный JWT-токен. Удаление мягкое: книга остаётся в таблице, но перестаёт возвращаться."),
    ),
    info(
        title = "Bookshelf Service API",
        version = "1.0.0",
        description = "REST API для каталога книг с JWT-аутентификацией.

## Аутентификация

Получите токен через `POST /login`, передавайте его в заголовке `Authorization`.
Токен действует 24 часа (настраивается).

## Формат ошибок

Все неуспешные ответы имеют вид:
```json
{\"error\": true, \"msg\": \"описание ошибки\"}
```",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(db: DatabaseConnection, jwt_config: JwtConfig) -> Router {
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
    };
    let auth_handler_state = auth::AuthHandlerState {
        db: db.clone(),
        jwt_config,
    };
    let book_state = books::AppState { db };

    // Every /books route sits behind the auth gate; /register, /login and
    // /health stay public.
    let book_routes = Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/{id}",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(book_state);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .with_state(auth_handler_state)
        .merge(book_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
