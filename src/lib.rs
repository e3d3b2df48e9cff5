//! # Bookshelf Service
//!
//! Small REST service for managing a personal book catalog with JWT
//! authentication.
//!
//! ## Architecture
//!
//! - **auth**: password hashing, JWT issue/verify and the request gate
//! - **api**: REST handlers, router and Swagger documentation
//! - **infrastructure**: database connection, entities and migrations
//! - **config**: TOML configuration loading

pub mod api;
pub mod auth;
pub mod config;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use api::create_api_router;
