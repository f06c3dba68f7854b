//! Client-side synchronization layer for the hioto device hub.
//!
//! # Overview
//! Registers, lists and controls IoT sensors and actuators and creates rules
//! linking them, against a remote REST API that owns every record. A host UI
//! feeds user intents (toggle, submit, scanned QR payload) into the views
//! here and renders what they expose.
//!
//! # Design
//! - `HiotoClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network; a `Transport` does the I/O.
//! - `Api` is constructed explicitly from a `ClientConfig` and a transport,
//!   so tests substitute a fake one.
//! - Responses are unwrapped from their `{code, status, message, data}`
//!   envelope before callers see them.
//! - Mutations publish a `ChangeEvent`; the `QueryCache` is the single
//!   subscriber that invalidates stale queries.
//! - The detail view's optimistic toggle is an explicit state machine
//!   (`OptimisticToggle`) that can be tested without any UI.

pub mod cache;
pub mod client;
pub mod config;
pub mod detail;
pub mod envelope;
pub mod error;
pub mod http;
pub mod list;
pub mod notify;
pub mod optimistic;
pub mod registration;
pub mod rules;
pub mod scan;
pub mod schema;
pub mod services;
pub mod session;
pub mod transport;
pub mod types;

pub use cache::{ChangeEvent, QueryCache, QueryKey};
pub use client::HiotoClient;
pub use config::{ClientConfig, ConfigError};
pub use detail::DeviceDetail;
pub use envelope::{Ack, Envelope, Reply};
pub use error::{ApiError, ViewError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::DeviceList;
pub use notify::{LogNotifier, Notifier, Toast, ToastKind, Toasts};
pub use optimistic::{OptimisticToggle, ToggleError, TogglePhase};
pub use registration::Registration;
pub use rules::{DeviceOption, RuleComposer};
pub use scan::{parse_scan, ScanError};
pub use schema::{DeviceForm, FieldError, FieldErrors, OutputDevice, RuleForm};
pub use services::{Api, DeviceService, GlobalService, RuleService};
pub use session::Session;
pub use transport::{Transport, UreqTransport};
pub use types::{ControlCommand, CreateRuleDto, Device, DeviceState, DeviceType, PowerState, RegisterDeviceDto, Rule};
