//! Error types for the hub client.
//!
//! # Design
//! Services never interpret failures: every non-2xx response becomes
//! `ApiError::Http` carrying the server's own message so a view can surface
//! it verbatim. Validation, scan and toggle failures have their own types
//! because they never reach the network.

use thiserror::Error;

use crate::optimistic::ToggleError;
use crate::schema::FieldErrors;

/// Errors produced by the transport, the envelope unwrapping, or the
/// request builders.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `message` is the envelope
    /// message when the body was an envelope, the raw body otherwise.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A 2xx envelope arrived without the `data` the call expects.
    #[error("response has no data: {0}")]
    MissingData(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors a view operation reports after it has already notified the user.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Invalid(#[from] FieldErrors),

    #[error(transparent)]
    Toggle(#[from] ToggleError),

    #[error("device {0} is not loaded")]
    NotLoaded(String),
}
