//! Optimistic status overlay for one device-detail view.
//!
//! # Design
//! The overlay shadows the server-reported status while a control command
//! is in flight. Phases:
//!
//! - `Settled`: no overlay, the server status is displayed.
//! - `Pending`: the command is in flight; the overlay shows the inverse of
//!   what was displayed when the user toggled.
//! - `Resolving`: the command succeeded and the canonical record is being
//!   re-fetched; the overlay stays until that record is observed.
//!
//! A failure in `Pending` or `Resolving` drops the overlay immediately, so
//! the overlay never outlives one resolved round trip. The machine is pure
//! state; the view drives it around the actual requests.

use thiserror::Error;

use crate::types::{ControlCommand, Device, PowerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePhase {
    Settled,
    Pending,
    Resolving,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    #[error("a control command is already in flight")]
    Busy,

    #[error("device {0} is not an actuator")]
    NotActuator(String),
}

#[derive(Debug, Clone)]
pub struct OptimisticToggle {
    phase: TogglePhase,
    overlay: Option<PowerState>,
}

impl Default for OptimisticToggle {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimisticToggle {
    pub fn new() -> Self {
        Self {
            phase: TogglePhase::Settled,
            overlay: None,
        }
    }

    pub fn phase(&self) -> TogglePhase {
        self.phase
    }

    pub fn overlay(&self) -> Option<PowerState> {
        self.overlay
    }

    /// `overlay ?? server`.
    pub fn displayed(&self, server: PowerState) -> PowerState {
        self.overlay.unwrap_or(server)
    }

    /// The toggle control is only enabled while settled.
    pub fn can_toggle(&self) -> bool {
        self.phase == TogglePhase::Settled
    }

    /// Flip the displayed status and return the command to send.
    pub fn begin(&mut self, device: &Device) -> Result<ControlCommand, ToggleError> {
        if !self.can_toggle() {
            return Err(ToggleError::Busy);
        }
        if !device.device_type.is_actuator() {
            return Err(ToggleError::NotActuator(device.guid.clone()));
        }
        let target = self.displayed(device.status).inverse();
        self.overlay = Some(target);
        self.phase = TogglePhase::Pending;
        Ok(ControlCommand::new(device.device_type, &device.guid, target))
    }

    /// The command was accepted; a re-fetch is expected next.
    pub fn succeeded(&mut self) {
        if self.phase == TogglePhase::Pending {
            self.phase = TogglePhase::Resolving;
        }
    }

    /// The command failed: revert the optimistic flip.
    pub fn failed(&mut self) {
        self.settle();
    }

    /// A fresh server record was observed. Clears the overlay unless a
    /// command is still in flight.
    pub fn refetched(&mut self) {
        if self.phase != TogglePhase::Pending {
            self.settle();
        }
    }

    /// The re-fetch after a successful command failed.
    pub fn refetch_failed(&mut self) {
        if self.phase == TogglePhase::Resolving {
            self.settle();
        }
    }

    /// Leaving the view discards everything.
    pub fn reset(&mut self) {
        self.settle();
    }

    fn settle(&mut self) {
        self.phase = TogglePhase::Settled;
        self.overlay = None;
    }
}
