//! Infrastructure module
//!
//! External concerns: database connection, entities and schema migrations.

pub mod database;

pub use database::{init_database, DatabaseConfig};
