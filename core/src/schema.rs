//! Client-side form validation.
//!
//! Both forms are validated synchronously before any request is built. A
//! failing form yields one message per offending field and never reaches
//! the network.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CreateRuleDto, Device, DeviceType, RegisterDeviceDto};

/// QR-encoded guids are at least this many characters long.
pub const GUID_MIN_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.errors))]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl FieldErrors {
    fn new() -> Self {
        Self { errors: Vec::new() }
    }

    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    /// The message attached to `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The device registration/update form. Every field is user-editable text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceForm {
    pub guid: String,
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub quantity: String,
    pub name: String,
    pub version: String,
    pub minor: String,
}

impl DeviceForm {
    pub fn validate(&self) -> Result<RegisterDeviceDto, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.guid.chars().count() < GUID_MIN_LEN {
            errors.push("guid", "Guid is required");
        }
        if self.mac.is_empty() {
            errors.push("mac", "Mac Address is required");
        }
        let device_type = match self.device_type.as_str() {
            "SENSOR" => Some(DeviceType::Sensor),
            "AKTUATOR" => Some(DeviceType::Aktuator),
            _ => {
                errors.push("type", "Type is required");
                None
            }
        };
        if self.quantity.is_empty() {
            errors.push("quantity", "Quantity is required");
        }
        if self.name.is_empty() {
            errors.push("name", "Name is required");
        }
        if self.version.is_empty() {
            errors.push("version", "Version is required");
        }
        if self.minor.is_empty() {
            errors.push("minor", "Minor is required");
        }

        match device_type {
            Some(device_type) => errors.into_result(|| RegisterDeviceDto {
                guid: self.guid.clone(),
                mac: self.mac.clone(),
                device_type,
                quantity: parse_leading_int(&self.quantity),
                name: self.name.clone(),
                version: self.version.clone(),
                minor: self.minor.clone(),
            }),
            None => Err(errors),
        }
    }

    /// Validate an update of the device identified by `guid`. The guid names
    /// the record being replaced, so it cannot be edited.
    pub fn validate_update(&self, guid: &str) -> Result<RegisterDeviceDto, FieldErrors> {
        let mut errors = match self.validate() {
            Ok(dto) if dto.guid == guid => return Ok(dto),
            Ok(_) => FieldErrors::new(),
            Err(errors) => errors,
        };
        if self.guid != guid && errors.get("guid").is_none() {
            errors.errors.insert(
                0,
                FieldError {
                    field: "guid",
                    message: "Guid cannot be changed",
                },
            );
        }
        Err(errors)
    }
}

impl From<&Device> for DeviceForm {
    /// The update form, pre-filled from the current record.
    fn from(device: &Device) -> Self {
        DeviceForm {
            guid: device.guid.clone(),
            mac: device.mac.clone(),
            device_type: device.device_type.list_kind().as_str().to_string(),
            quantity: device.quantity.to_string(),
            name: device.name.clone(),
            version: device.version.clone(),
            minor: device.minor.clone(),
        }
    }
}

/// Integer prefix of `raw`: leading whitespace, an optional sign, then
/// digits. `"12abc"` is 12; `"abc"` has none.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// One selected actuator in the rule form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDevice {
    pub value: String,
}

/// The rule creation form: one sensor input, a deduplicated list of
/// actuator outputs edited by append and remove-by-index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleForm {
    pub input_device: String,
    output_devices: Vec<OutputDevice>,
}

impl RuleForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_input(&mut self, guid: impl Into<String>) {
        self.input_device = guid.into();
    }

    pub fn output_devices(&self) -> &[OutputDevice] {
        &self.output_devices
    }

    /// Adds `guid` unless it is already selected. Returns whether it was added.
    pub fn append(&mut self, guid: impl Into<String>) -> bool {
        let guid = guid.into();
        if self.output_devices.iter().any(|o| o.value == guid) {
            return false;
        }
        self.output_devices.push(OutputDevice { value: guid });
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<OutputDevice> {
        (index < self.output_devices.len()).then(|| self.output_devices.remove(index))
    }

    pub fn reset_outputs(&mut self) {
        self.output_devices.clear();
    }

    pub fn validate(&self) -> Result<CreateRuleDto, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.input_device.is_empty() {
            errors.push("inputDevice", "Input Device is required");
        }
        if self.output_devices.is_empty() {
            errors.push("outputDevices", "Choose at least one output device");
        }
        errors.into_result(|| CreateRuleDto {
            input_guid: self.input_device.clone(),
            output_guid: self.output_devices.iter().map(|o| o.value.clone()).collect(),
        })
    }
}
