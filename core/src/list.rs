//! Device list per kind, served from the query cache.

use crate::cache::ChangeEvent;
use crate::envelope::Ack;
use crate::error::ViewError;
use crate::notify::Notifier;
use crate::optimistic::ToggleError;
use crate::session::Session;
use crate::transport::Transport;
use crate::types::{ControlCommand, Device, DeviceType};

#[derive(Debug, Clone)]
pub struct DeviceList {
    kind: DeviceType,
}

impl DeviceList {
    pub fn new(kind: DeviceType) -> Self {
        Self {
            kind: kind.list_kind(),
        }
    }

    pub fn kind(&self) -> DeviceType {
        self.kind
    }

    pub fn select(&mut self, kind: DeviceType) {
        self.kind = kind.list_kind();
    }

    /// Cached devices of the selected kind, fetched on a cache miss.
    pub fn devices<'s, T: Transport, N: Notifier>(
        &self,
        session: &'s mut Session<T, N>,
    ) -> Result<&'s [Device], ViewError> {
        if session.cache().list(self.kind).is_none() {
            self.refresh(session)?;
        }
        Ok(session.cache().list(self.kind).unwrap_or_default())
    }

    /// Fetch the list from the server regardless of the cache.
    pub fn refresh<T: Transport, N: Notifier>(&self, session: &mut Session<T, N>) -> Result<(), ViewError> {
        match session.api().devices().get_all_device(self.kind) {
            Ok(reply) => {
                session.cache_mut().store_list(self.kind, reply.data);
                Ok(())
            }
            Err(err) => {
                session.report(&err);
                Err(err.into())
            }
        }
    }

    /// Toggle from a list card. No optimistic phase: the card shows the
    /// server status until the invalidated list is fetched again.
    pub fn toggle<T: Transport, N: Notifier>(
        &self,
        session: &mut Session<T, N>,
        device: &Device,
    ) -> Result<Ack, ViewError> {
        if !device.device_type.is_actuator() {
            return Err(ToggleError::NotActuator(device.guid.clone()).into());
        }
        let command = ControlCommand::new(device.device_type, &device.guid, device.status.inverse());
        match session.api().devices().control_device(&command) {
            Ok(ack) => {
                session.publish(ChangeEvent::DeviceChanged {
                    guid: device.guid.clone(),
                    device_type: device.device_type,
                });
                Ok(ack)
            }
            Err(err) => {
                session.report(&err);
                Err(err.into())
            }
        }
    }
}
