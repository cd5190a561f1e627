//! HTTP API module.
//!
//! REST endpoints for the conversational relay: text turns, file turns,
//! history reset and liveness.

mod error;
pub mod handlers;
mod routes;
mod state;

// Re-export error types for external use
#[allow(unused_imports)]
pub use error::{ApiError, ApiResult, ErrorBody, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
