//! Device-detail view: optimistic toggle, update and delete.
//!
//! # Design
//! The toggle runs the `OptimisticToggle` machine around the control
//! request and the re-fetch that follows it. Update and delete have no
//! optimistic phase: they either commit (publish, notify) or leave the view
//! exactly as it was and surface the server's message.

use tracing::debug;

use crate::cache::ChangeEvent;
use crate::error::ViewError;
use crate::notify::Notifier;
use crate::optimistic::OptimisticToggle;
use crate::schema::DeviceForm;
use crate::session::Session;
use crate::transport::Transport;
use crate::types::{Device, PowerState};

#[derive(Debug, Clone)]
pub struct DeviceDetail {
    guid: String,
    device: Option<Device>,
    toggle: OptimisticToggle,
}

impl DeviceDetail {
    pub fn open(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            device: None,
            toggle: OptimisticToggle::new(),
        }
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    pub fn toggle_state(&self) -> &OptimisticToggle {
        &self.toggle
    }

    /// The status to render: the overlay while one exists, the server's otherwise.
    pub fn displayed_status(&self) -> Option<PowerState> {
        self.device.as_ref().map(|d| self.toggle.displayed(d.status))
    }

    pub fn can_toggle(&self) -> bool {
        self.device
            .as_ref()
            .is_some_and(|d| d.device_type.is_actuator() && self.toggle.can_toggle())
    }

    /// The update form, pre-filled from the loaded record.
    pub fn edit_form(&self) -> Option<DeviceForm> {
        self.device.as_ref().map(DeviceForm::from)
    }

    /// Show the cached record if there is one, otherwise fetch it.
    pub fn load<T: Transport, N: Notifier>(&mut self, session: &mut Session<T, N>) -> Result<&Device, ViewError> {
        match session.cache().device(&self.guid).cloned() {
            Some(device) => {
                self.device = Some(device);
                self.toggle.refetched();
            }
            None => self.refetch(session)?,
        }
        self.device
            .as_ref()
            .ok_or_else(|| ViewError::NotLoaded(self.guid.clone()))
    }

    /// Fetch the canonical record from the server.
    pub fn refetch<T: Transport, N: Notifier>(&mut self, session: &mut Session<T, N>) -> Result<(), ViewError> {
        match session.api().devices().get_device_by_guid(&self.guid) {
            Ok(reply) => {
                session.cache_mut().store_device(reply.data.clone());
                self.device = Some(reply.data);
                self.toggle.refetched();
                Ok(())
            }
            Err(err) => {
                session.report(&err);
                Err(err.into())
            }
        }
    }

    /// Flip the device optimistically, send the command, then re-fetch.
    pub fn toggle<T: Transport, N: Notifier>(&mut self, session: &mut Session<T, N>) -> Result<(), ViewError> {
        let device = self
            .device
            .as_ref()
            .ok_or_else(|| ViewError::NotLoaded(self.guid.clone()))?;
        let device_type = device.device_type;
        let command = self.toggle.begin(device)?;
        debug!(guid = %self.guid, message = %command.message, "toggle pending");

        if let Err(err) = session.api().devices().control_device(&command) {
            self.toggle.failed();
            session.report(&err);
            return Err(err.into());
        }
        self.toggle.succeeded();

        session.publish(ChangeEvent::DeviceChanged {
            guid: self.guid.clone(),
            device_type,
        });
        if let Err(err) = self.refetch(session) {
            self.toggle.refetch_failed();
            return Err(err);
        }
        Ok(())
    }

    /// Validate `form` and submit it as a full-record update of this device.
    pub fn update<T: Transport, N: Notifier>(
        &mut self,
        session: &mut Session<T, N>,
        form: &DeviceForm,
    ) -> Result<&Device, ViewError> {
        let dto = form.validate_update(&self.guid)?;
        let previous = self.device.as_ref().map(|d| d.device_type);

        let reply = match session.api().devices().update_device(&dto) {
            Ok(reply) => reply,
            Err(err) => {
                session.report(&err);
                return Err(err.into());
            }
        };

        let updated = reply.data;
        if let Some(previous) = previous.filter(|p| p.list_kind() != updated.device_type.list_kind()) {
            session.publish(ChangeEvent::DeviceChanged {
                guid: updated.guid.clone(),
                device_type: previous,
            });
        }
        session.publish(ChangeEvent::DeviceChanged {
            guid: updated.guid.clone(),
            device_type: updated.device_type,
        });
        session.cache_mut().store_device(updated.clone());
        session.announce(&reply.message);

        self.toggle.refetched();
        Ok(self.device.insert(updated))
    }

    /// Delete the device. On success the view is closed; on failure nothing
    /// changes and the server's message is shown.
    pub fn delete<T: Transport, N: Notifier>(&mut self, session: &mut Session<T, N>) -> Result<Device, ViewError> {
        match session.api().devices().delete_device_by_guid(&self.guid) {
            Ok(reply) => {
                session.publish(ChangeEvent::DeviceRemoved {
                    guid: self.guid.clone(),
                    device_type: reply.data.device_type,
                });
                session.announce(&reply.message);
                self.close();
                Ok(reply.data)
            }
            Err(err) => {
                session.report(&err);
                Err(err.into())
            }
        }
    }

    /// Navigation away from the view.
    pub fn close(&mut self) {
        self.device = None;
        self.toggle.reset();
    }
}
