//! Database entities module

pub mod book;
pub mod user;

pub use book::Entity as Book;
pub use user::Entity as User;
