//! REST API module

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;

pub use error::{ApiError, ErrorBody};
pub use router::create_api_router;
