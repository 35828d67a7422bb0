//! Generative flows
//!
//! One module per flow, each pairing a prompt template with its declared
//! input/output schemas and a typed entry point. Flows never retry; the
//! serving layer decides where a retry wrapper applies.

pub mod cost;
pub mod generate;
pub mod image;
pub mod timing;
