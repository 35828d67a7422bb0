//! Bucket List Generator
//!
//! A generative-AI backend that:
//! - Turns user interests into a personalized list of activities
//! - Validates requests and model output against declared schemas
//! - Attaches a best-effort image to each activity via a concurrent fan-out
//! - Serves on-demand per-activity enrichments (timing, cost) behind a
//!   bounded retry-with-fallback wrapper
//!
//! PIPELINE:
//! REQUEST → VALIDATE → RENDER PROMPT → GENERATE → FAN-OUT IMAGES → SESSION LIST

pub mod api;
pub mod enrich;
pub mod error;
pub mod flows;
pub mod gemini;
pub mod models;
pub mod prompt;
pub mod retry;
pub mod schema;
pub mod session;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use retry::{with_retry, RetryOutcome, RetryPolicy};
