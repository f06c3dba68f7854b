//! Scan-to-register flow.

use crate::cache::ChangeEvent;
use crate::error::ViewError;
use crate::notify::Notifier;
use crate::scan::{parse_scan, ScanError};
use crate::schema::{DeviceForm, FieldErrors};
use crate::session::Session;
use crate::transport::Transport;
use crate::types::Device;

#[derive(Debug, Clone, Default)]
pub struct Registration {
    form: DeviceForm,
    errors: Option<FieldErrors>,
}

impl Registration {
    /// A blank form for manual entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled from a scanned QR payload.
    pub fn from_scan(raw: &str) -> Result<Self, ScanError> {
        Ok(Self {
            form: parse_scan(raw)?,
            errors: None,
        })
    }

    pub fn form(&self) -> &DeviceForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut DeviceForm {
        &mut self.form
    }

    /// Per-field messages from the last rejected submit.
    pub fn errors(&self) -> Option<&FieldErrors> {
        self.errors.as_ref()
    }

    pub fn submit<T: Transport, N: Notifier>(&mut self, session: &mut Session<T, N>) -> Result<Device, ViewError> {
        let dto = match self.form.validate() {
            Ok(dto) => dto,
            Err(errors) => {
                self.errors = Some(errors.clone());
                return Err(errors.into());
            }
        };
        self.errors = None;

        match session.api().devices().register_device(&dto) {
            Ok(reply) => {
                session.publish(ChangeEvent::DeviceChanged {
                    guid: reply.data.guid.clone(),
                    device_type: reply.data.device_type,
                });
                session.announce(&reply.message);
                Ok(reply.data)
            }
            Err(err) => {
                session.report(&err);
                Err(err.into())
            }
        }
    }
}
