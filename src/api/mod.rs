//! API layer
//!
//! HTTP handlers for:
//! - Tweet resource (`/tweets`)
//! - Metrics (Prometheus)

mod dto;
mod extract;
pub mod metrics;
mod tweets;

pub use dto::*;
pub use metrics::{metrics_router, track_http_metrics};
pub use tweets::tweets_router;
