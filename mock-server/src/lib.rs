use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const MAC_SERVER: &str = "00:1A:2B:3C:4D:5E";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub guid: String,
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub quantity: i64,
    pub name: String,
    pub version: String,
    pub minor: String,
    pub status: String,
    pub status_device: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Device {
    fn is_sensor(&self) -> bool {
        self.device_type.starts_with("SENSOR")
    }

    fn is_actuator(&self) -> bool {
        self.device_type == "AKTUATOR"
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rule {
    pub mac_server: String,
    pub input_guid: String,
    pub input_value: String,
    pub output_guid: String,
    pub output_value: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct DeviceInput {
    pub guid: String,
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub quantity: i64,
    pub name: String,
    pub version: String,
    pub minor: String,
}

#[derive(Deserialize)]
pub struct ControlInput {
    #[serde(rename = "type")]
    pub device_type: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct RuleInput {
    pub input_guid: String,
    pub output_guid: Vec<String>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub device_type: Option<String>,
}

struct StoredRule {
    input_guid: String,
    outputs: Vec<String>,
}

impl StoredRule {
    fn references(&self, guid: &str) -> bool {
        self.input_guid == guid || self.outputs.iter().any(|o| o == guid)
    }
}

#[derive(Default)]
pub struct Store {
    devices: Vec<Device>,
    rules: Vec<StoredRule>,
    next_id: i64,
}

pub type Db = Arc<RwLock<Store>>;

/// A rejected request, rendered as an envelope with `status: false`.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Device not found")
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = Envelope::<()> {
            code: self.status.as_u16(),
            status: false,
            message: self.message,
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}

type Reply<T> = Result<(StatusCode, Json<Envelope<T>>), Failure>;

fn reply<T>(status: StatusCode, message: &str, data: Option<T>) -> Reply<T> {
    Ok((
        status,
        Json(Envelope {
            code: status.as_u16(),
            status: true,
            message: message.to_string(),
            data,
        }),
    ))
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(health))
        .route("/device", post(register_device).put(update_device))
        .route("/devices", get(list_devices))
        .route("/device/control", put(control_device))
        .route("/device/{guid}", get(get_device).delete(delete_device))
        .route("/rule", post(create_rule))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> Reply<()> {
    reply(StatusCode::OK, "Hioto API is running", None)
}

async fn register_device(State(db): State<Db>, Json(input): Json<DeviceInput>) -> Reply<Device> {
    let mut store = db.write().await;
    if store.devices.iter().any(|d| d.guid == input.guid) {
        return Err(Failure::new(StatusCode::CONFLICT, "Device already registered"));
    }
    store.next_id += 1;
    let timestamp = now();
    let device = Device {
        id: store.next_id,
        guid: input.guid,
        mac: input.mac,
        device_type: input.device_type,
        quantity: input.quantity,
        name: input.name,
        version: input.version,
        minor: input.minor,
        status: "0".to_string(),
        status_device: "OFF".to_string(),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    store.devices.push(device.clone());
    info!(guid = %device.guid, "device registered");
    reply(StatusCode::CREATED, "Device registered", Some(device))
}

async fn list_devices(State(db): State<Db>, Query(query): Query<ListQuery>) -> Reply<Vec<Device>> {
    let store = db.read().await;
    let devices = store
        .devices
        .iter()
        .filter(|d| match query.device_type.as_deref() {
            Some("AKTUATOR") => d.is_actuator(),
            Some("SENSOR") => d.is_sensor(),
            Some(other) => d.device_type == other,
            None => true,
        })
        .cloned()
        .collect();
    reply(StatusCode::OK, "Devices retrieved", Some(devices))
}

async fn get_device(State(db): State<Db>, Path(guid): Path<String>) -> Reply<Device> {
    let store = db.read().await;
    let device = store
        .devices
        .iter()
        .find(|d| d.guid == guid)
        .cloned()
        .ok_or_else(Failure::not_found)?;
    reply(StatusCode::OK, "Device retrieved", Some(device))
}

async fn control_device(State(db): State<Db>, Json(input): Json<ControlInput>) -> Reply<()> {
    let (guid, code) = input
        .message
        .rsplit_once('#')
        .filter(|(_, code)| *code == "0" || *code == "1")
        .ok_or_else(|| Failure::new(StatusCode::BAD_REQUEST, "Invalid control message"))?;

    let mut store = db.write().await;
    let device = store
        .devices
        .iter_mut()
        .find(|d| d.guid == guid)
        .ok_or_else(Failure::not_found)?;
    if !device.is_actuator() || input.device_type != device.device_type {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "Device is not an actuator"));
    }
    device.status = code.to_string();
    device.status_device = if code == "1" { "ON" } else { "OFF" }.to_string();
    device.updated_at = now();
    info!(guid, status = code, "device controlled");

    let message = if code == "1" { "Device turned on" } else { "Device turned off" };
    reply(StatusCode::OK, message, None)
}

async fn update_device(State(db): State<Db>, Json(input): Json<DeviceInput>) -> Reply<Device> {
    let mut store = db.write().await;
    let device = store
        .devices
        .iter_mut()
        .find(|d| d.guid == input.guid)
        .ok_or_else(Failure::not_found)?;
    device.mac = input.mac;
    device.device_type = input.device_type;
    device.quantity = input.quantity;
    device.name = input.name;
    device.version = input.version;
    device.minor = input.minor;
    device.updated_at = now();
    info!(guid = %device.guid, "device updated");
    let device = device.clone();
    reply(StatusCode::OK, "Device updated", Some(device))
}

async fn delete_device(State(db): State<Db>, Path(guid): Path<String>) -> Reply<Device> {
    let mut store = db.write().await;
    let index = store
        .devices
        .iter()
        .position(|d| d.guid == guid)
        .ok_or_else(Failure::not_found)?;
    if store.rules.iter().any(|r| r.references(&guid)) {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "Device is used by a rule"));
    }
    let device = store.devices.remove(index);
    info!(guid = %device.guid, "device deleted");
    reply(StatusCode::OK, "Device deleted", Some(device))
}

async fn create_rule(State(db): State<Db>, Json(input): Json<RuleInput>) -> Reply<Rule> {
    if input.output_guid.is_empty() {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "Output devices are required"));
    }
    let mut store = db.write().await;
    let lookup = |guid: &str| store.devices.iter().find(|d| d.guid == guid);

    if !lookup(&input.input_guid).is_some_and(Device::is_sensor) {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "Input device must be a sensor"));
    }
    if let Some(bad) = input
        .output_guid
        .iter()
        .find(|guid| !lookup(guid.as_str()).is_some_and(Device::is_actuator))
    {
        return Err(Failure::new(
            StatusCode::BAD_REQUEST,
            format!("Output device {bad} must be an actuator"),
        ));
    }

    let timestamp = now();
    let rule = Rule {
        mac_server: MAC_SERVER.to_string(),
        input_guid: input.input_guid.clone(),
        input_value: "1".to_string(),
        output_guid: input.output_guid.join(","),
        output_value: "1".to_string(),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    store.rules.push(StoredRule {
        input_guid: input.input_guid,
        outputs: input.output_guid,
    });
    info!(input = %rule.input_guid, outputs = %rule.output_guid, "rule created");
    reply(StatusCode::CREATED, "Rule created", Some(rule))
}
