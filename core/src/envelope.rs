//! Response envelope unwrapping.
//!
//! Every response body is `{code, status, message, data?}`. The functions
//! here strip that wrapper so callers receive the payload (or the bare
//! message for commands without one). The HTTP status alone decides success.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::HttpResponse;

/// The outer wrapper of every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// A message-only response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub code: u16,
    pub status: bool,
    pub message: String,
}

/// An unwrapped payload together with the server's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    pub message: String,
    pub data: T,
}

/// Unwrap a response that must carry `data`.
pub fn unwrap_reply<T: DeserializeOwned>(response: HttpResponse) -> Result<Reply<T>, ApiError> {
    check_status(&response)?;
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    match envelope.data {
        Some(data) => Ok(Reply {
            message: envelope.message,
            data,
        }),
        None => Err(ApiError::MissingData(envelope.message)),
    }
}

/// Unwrap a response whose payload, if any, is ignored.
pub fn unwrap_ack(response: HttpResponse) -> Result<Ack, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map a non-2xx status to `ApiError::Http`, keeping the server's message.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<Ack>(&response.body)
        .map(|ack| ack.message)
        .unwrap_or_else(|_| response.body.clone());
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}
