//! Error types for the bucket list generator

use thiserror::Error;

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, BucketListError>;

#[derive(Error, Debug)]
pub enum BucketListError {

    // =============================
    // Core Errors
    // =============================

    /// A request or model response did not match its declared schema.
    /// `path` identifies the offending field (e.g. `bucketListItems[2].activity`).
    #[error("validation error at '{path}': {reason}")]
    Validation { path: String, reason: String },

    /// The generative backend was unreachable, returned a non-success
    /// status, or returned a response with no usable payload.
    #[error("generation error: {0}")]
    Generation(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BucketListError {
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
