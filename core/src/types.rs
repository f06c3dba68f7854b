//! Wire DTOs for the hub API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently
//! so integration tests catch schema drift between the two crates. The
//! server owns every record; the client only reads them and sends commands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a registered device. Sensor subtypes share the `SENSOR` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Sensor,
    Aktuator,
    SensorTemperature,
    SensorWaterLevel,
    SensorParking,
}

impl DeviceType {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceType::Sensor => "SENSOR",
            DeviceType::Aktuator => "AKTUATOR",
            DeviceType::SensorTemperature => "SENSOR_TEMPERATURE",
            DeviceType::SensorWaterLevel => "SENSOR_WATER_LEVEL",
            DeviceType::SensorParking => "SENSOR_PARKING",
        }
    }

    /// The list a device of this type shows up in: `Sensor` or `Aktuator`.
    pub fn list_kind(self) -> DeviceType {
        match self {
            DeviceType::Aktuator => DeviceType::Aktuator,
            _ => DeviceType::Sensor,
        }
    }

    pub fn is_actuator(self) -> bool {
        self == DeviceType::Aktuator
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Power status as the server transmits it: `"1"` for on, `"0"` for off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerState {
    #[serde(rename = "1")]
    On,
    #[serde(rename = "0")]
    Off,
}

impl PowerState {
    pub fn inverse(self) -> PowerState {
        match self {
            PowerState::On => PowerState::Off,
            PowerState::Off => PowerState::On,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            PowerState::On => "1",
            PowerState::Off => "0",
        }
    }

    pub fn is_on(self) -> bool {
        self == PowerState::On
    }
}

/// Human-readable device state reported alongside `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceState {
    On,
    Off,
}

/// A device record as returned by the API.
///
/// `guid` is the natural key; `id` is the server's surrogate and is never
/// used for addressing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub guid: String,
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub quantity: i64,
    pub name: String,
    pub version: String,
    pub minor: String,
    pub status: PowerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_device: Option<DeviceState>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Payload for registering or updating a device.
///
/// `quantity` is `None` when the form's quantity had no leading integer; it
/// is then sent as JSON `null` and the server decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDeviceDto {
    pub guid: String,
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub quantity: Option<i64>,
    pub name: String,
    pub version: String,
    pub minor: String,
}

/// An on/off instruction. Exists only for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCommand {
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub message: String,
}

impl ControlCommand {
    /// Command driving `guid` to `target`, e.g. `"ABCD1234#1"` to turn it on.
    pub fn new(device_type: DeviceType, guid: &str, target: PowerState) -> Self {
        Self {
            device_type,
            message: format!("{guid}#{}", target.code()),
        }
    }
}

/// Payload for creating a rule: one sensor input, one or more actuators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRuleDto {
    pub input_guid: String,
    pub output_guid: Vec<String>,
}

/// A rule as read back from the server.
///
/// The server reports the outputs as a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub mac_server: String,
    pub input_guid: String,
    pub input_value: String,
    pub output_guid: String,
    pub output_value: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}
