//! Resource services: one borrowed handle per backend resource.
//!
//! Each operation is build, execute, parse. Services never catch, map or
//! retry; whatever the transport or the envelope layer reports is returned
//! to the caller unchanged.

use crate::client::HiotoClient;
use crate::config::ClientConfig;
use crate::envelope::{Ack, Reply};
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{ControlCommand, CreateRuleDto, Device, DeviceType, RegisterDeviceDto, Rule};

/// An explicitly constructed API handle: request builder plus transport.
#[derive(Debug, Clone)]
pub struct Api<T> {
    client: HiotoClient,
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(client: HiotoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        Self::new(HiotoClient::new(&config.base_url), transport)
    }

    pub fn client(&self) -> &HiotoClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn devices(&self) -> DeviceService<'_, T> {
        DeviceService { api: self }
    }

    pub fn rules(&self) -> RuleService<'_, T> {
        RuleService { api: self }
    }

    pub fn global(&self) -> GlobalService<'_, T> {
        GlobalService { api: self }
    }
}

pub struct DeviceService<'a, T> {
    api: &'a Api<T>,
}

impl<T: Transport> DeviceService<'_, T> {
    pub fn register_device(&self, dto: &RegisterDeviceDto) -> Result<Reply<Device>, ApiError> {
        let client = &self.api.client;
        let response = self.api.transport.execute(client.build_register_device(dto)?)?;
        client.parse_register_device(response)
    }

    /// Devices of one list kind, in server order.
    pub fn get_all_device(&self, device_type: DeviceType) -> Result<Reply<Vec<Device>>, ApiError> {
        let client = &self.api.client;
        let response = self.api.transport.execute(client.build_get_all_device(device_type))?;
        client.parse_get_all_device(response)
    }

    pub fn get_device_by_guid(&self, guid: &str) -> Result<Reply<Device>, ApiError> {
        let client = &self.api.client;
        let response = self.api.transport.execute(client.build_get_device_by_guid(guid))?;
        client.parse_get_device_by_guid(response)
    }

    /// Sends an on/off command. The reply carries no device; re-fetch to
    /// observe the new state.
    pub fn control_device(&self, command: &ControlCommand) -> Result<Ack, ApiError> {
        let client = &self.api.client;
        let response = self.api.transport.execute(client.build_control_device(command)?)?;
        client.parse_control_device(response)
    }

    pub fn update_device(&self, dto: &RegisterDeviceDto) -> Result<Reply<Device>, ApiError> {
        let client = &self.api.client;
        let response = self.api.transport.execute(client.build_update_device(dto)?)?;
        client.parse_update_device(response)
    }

    pub fn delete_device_by_guid(&self, guid: &str) -> Result<Reply<Device>, ApiError> {
        let client = &self.api.client;
        let response = self.api.transport.execute(client.build_delete_device_by_guid(guid))?;
        client.parse_delete_device_by_guid(response)
    }
}

/// Rules can only be created from the client.
pub struct RuleService<'a, T> {
    api: &'a Api<T>,
}

impl<T: Transport> RuleService<'_, T> {
    pub fn create_rule(&self, dto: &CreateRuleDto) -> Result<Reply<Rule>, ApiError> {
        let client = &self.api.client;
        let response = self.api.transport.execute(client.build_create_rule(dto)?)?;
        client.parse_create_rule(response)
    }
}

pub struct GlobalService<'a, T> {
    api: &'a Api<T>,
}

impl<T: Transport> GlobalService<'_, T> {
    /// Health check against the API root.
    pub fn init_api(&self) -> Result<Ack, ApiError> {
        let client = &self.api.client;
        let response = self.api.transport.execute(client.build_init_api())?;
        client.parse_init_api(response)
    }
}
