//! Rule composer: pick one sensor, one or more actuators, submit.

use crate::cache::ChangeEvent;
use crate::error::{ApiError, ViewError};
use crate::notify::Notifier;
use crate::schema::{FieldErrors, RuleForm};
use crate::session::Session;
use crate::transport::Transport;
use crate::types::{Device, DeviceType, Rule};

/// A selectable device: its name as label, its guid as value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOption {
    pub label: String,
    pub value: String,
}

impl From<&Device> for DeviceOption {
    fn from(device: &Device) -> Self {
        Self {
            label: device.name.clone(),
            value: device.guid.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleComposer {
    sensors: Vec<DeviceOption>,
    actuators: Vec<DeviceOption>,
    form: RuleForm,
    errors: Option<FieldErrors>,
}

impl RuleComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensors(&self) -> &[DeviceOption] {
        &self.sensors
    }

    pub fn actuators(&self) -> &[DeviceOption] {
        &self.actuators
    }

    pub fn form(&self) -> &RuleForm {
        &self.form
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        self.errors.as_ref()
    }

    /// Fetch both option lists. A failure in one does not stop the other;
    /// the first failure is returned after both were attempted.
    pub fn load_options<T: Transport, N: Notifier>(&mut self, session: &mut Session<T, N>) -> Result<(), ViewError> {
        let sensors = fetch_options(session, DeviceType::Sensor);
        let actuators = fetch_options(session, DeviceType::Aktuator);
        let mut first_error = None;
        match sensors {
            Ok(options) => self.sensors = options,
            Err(err) => first_error = Some(err),
        }
        match actuators {
            Ok(options) => self.actuators = options,
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Pull-to-refresh: reload the options and clear the selected outputs.
    pub fn refresh<T: Transport, N: Notifier>(&mut self, session: &mut Session<T, N>) -> Result<(), ViewError> {
        let result = self.load_options(session);
        self.form.reset_outputs();
        result
    }

    pub fn select_input(&mut self, guid: impl Into<String>) {
        self.form.select_input(guid);
    }

    /// Selecting an actuator that is already in the list does nothing.
    pub fn add_output(&mut self, guid: impl Into<String>) -> bool {
        self.form.append(guid)
    }

    pub fn remove_output(&mut self, index: usize) {
        self.form.remove(index);
    }

    /// Validate and create the rule. The selected outputs are cleared after
    /// every attempt that reached the server.
    pub fn submit<T: Transport, N: Notifier>(&mut self, session: &mut Session<T, N>) -> Result<Rule, ViewError> {
        let dto = match self.form.validate() {
            Ok(dto) => dto,
            Err(errors) => {
                self.errors = Some(errors.clone());
                return Err(errors.into());
            }
        };
        self.errors = None;

        let result = session.api().rules().create_rule(&dto);
        self.form.reset_outputs();
        match result {
            Ok(reply) => {
                session.announce(&reply.message);
                session.publish(ChangeEvent::RuleCreated {
                    input_guid: dto.input_guid,
                });
                Ok(reply.data)
            }
            Err(err) => {
                session.report(&err);
                Err(err.into())
            }
        }
    }
}

fn fetch_options<T: Transport, N: Notifier>(
    session: &mut Session<T, N>,
    kind: DeviceType,
) -> Result<Vec<DeviceOption>, ApiError> {
    match session.api().devices().get_all_device(kind) {
        Ok(reply) => Ok(reply.data.iter().map(DeviceOption::from).collect()),
        Err(err) => {
            session.report(&err);
            Err(err)
        }
    }
}
