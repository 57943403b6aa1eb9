//! Error types for the host layer.
//!
//! Only control-thread operations return errors. The audio path sanitises
//! its input and never fails.

use thiserror::Error;

/// Errors from preparing a processor or addressing parameters.
#[derive(Debug, Error, PartialEq)]
pub enum HostError {
    /// Sample rate is zero, negative or not finite
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    /// Maximum block size of zero
    #[error("maximum block size must be at least 1")]
    InvalidBlockSize,

    /// No parameter matches the given name or id
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
}

impl HostError {
    /// Create an unknown parameter error.
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        HostError::UnknownParameter(name.into())
    }
}

/// Errors from saving or loading a state blob.
#[derive(Debug, Error)]
pub enum StateError {
    /// Blob is not valid JSON, or serialization failed
    #[error("invalid state JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Blob is valid JSON but not an object
    #[error("state is not a JSON object")]
    NotAnObject,

    /// A known parameter id maps to something other than a number
    #[error("value for parameter '{key}' is not a number")]
    NonNumeric {
        /// The offending key.
        key: String,
    },
}

impl StateError {
    /// Create a non-numeric value error.
    pub fn non_numeric(key: impl Into<String>) -> Self {
        StateError::NonNumeric { key: key.into() }
    }
}
