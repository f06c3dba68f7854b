//! QR payload decoding.
//!
//! A device's QR code carries a JSON object whose fields are all strings.
//! Decoding it yields an editable, pre-filled `DeviceForm`; validation is
//! left to the form's submit.

use serde::Deserialize;
use thiserror::Error;

use crate::schema::DeviceForm;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scanned code is not a device payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ScanPayload {
    guid: String,
    mac: String,
    #[serde(rename = "type")]
    device_type: String,
    quantity: String,
    name: String,
    version: String,
    minor: String,
}

impl From<ScanPayload> for DeviceForm {
    fn from(payload: ScanPayload) -> Self {
        DeviceForm {
            guid: payload.guid,
            mac: payload.mac,
            device_type: payload.device_type,
            quantity: payload.quantity,
            name: payload.name,
            version: payload.version,
            minor: payload.minor,
        }
    }
}

/// Decode a scanned QR string into a pre-filled registration form.
pub fn parse_scan(raw: &str) -> Result<DeviceForm, ScanError> {
    let payload: ScanPayload = serde_json::from_str(raw)?;
    Ok(payload.into())
}
