//! API Handlers

pub mod auth;
pub mod books;
pub mod health;

pub use auth::AuthHandlerState;
pub use books::AppState;
