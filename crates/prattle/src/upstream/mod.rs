//! Upstream completion API client module.
//!
//! Issues outbound chat-completion requests, selects the model variant, and
//! classifies transport and response failures into a typed error.

mod client;
mod error;
mod types;

pub use client::{ModelHint, UpstreamClient};
pub use error::{UpstreamError, UpstreamResult};
pub use types::*;
