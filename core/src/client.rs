//! Stateless HTTP request builder and response parser for the hub API.
//!
//! # Design
//! `HiotoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! round-trip in between belongs to a `Transport`.

use serde::Serialize;

use crate::envelope::{unwrap_ack, unwrap_reply, Ack, Reply};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ControlCommand, CreateRuleDto, Device, DeviceType, RegisterDeviceDto, Rule};

/// Synchronous, stateless client for the hub API.
#[derive(Debug, Clone)]
pub struct HiotoClient {
    base_url: String,
}

impl HiotoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_init_api(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/")
    }

    pub fn build_register_device(&self, dto: &RegisterDeviceDto) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/device", dto)
    }

    pub fn build_get_all_device(&self, device_type: DeviceType) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/devices?type={device_type}"))
    }

    pub fn build_get_device_by_guid(&self, guid: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &device_path(guid))
    }

    pub fn build_control_device(&self, command: &ControlCommand) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, "/device/control", command)
    }

    pub fn build_update_device(&self, dto: &RegisterDeviceDto) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, "/device", dto)
    }

    pub fn build_delete_device_by_guid(&self, guid: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &device_path(guid))
    }

    pub fn build_create_rule(&self, dto: &CreateRuleDto) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/rule", dto)
    }

    pub fn parse_init_api(&self, response: HttpResponse) -> Result<Ack, ApiError> {
        unwrap_ack(response)
    }

    pub fn parse_register_device(&self, response: HttpResponse) -> Result<Reply<Device>, ApiError> {
        unwrap_reply(response)
    }

    pub fn parse_get_all_device(&self, response: HttpResponse) -> Result<Reply<Vec<Device>>, ApiError> {
        unwrap_reply(response)
    }

    pub fn parse_get_device_by_guid(&self, response: HttpResponse) -> Result<Reply<Device>, ApiError> {
        unwrap_reply(response)
    }

    pub fn parse_control_device(&self, response: HttpResponse) -> Result<Ack, ApiError> {
        unwrap_ack(response)
    }

    pub fn parse_update_device(&self, response: HttpResponse) -> Result<Reply<Device>, ApiError> {
        unwrap_reply(response)
    }

    pub fn parse_delete_device_by_guid(&self, response: HttpResponse) -> Result<Reply<Device>, ApiError> {
        unwrap_reply(response)
    }

    pub fn parse_create_rule(&self, response: HttpResponse) -> Result<Reply<Rule>, ApiError> {
        unwrap_reply(response)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: self.url(path),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(&self, method: HttpMethod, path: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: self.url(path),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Guids are arbitrary strings, so they travel as one encoded path segment.
fn device_path(guid: &str) -> String {
    format!("/device/{}", urlencoding::encode(guid))
}
