//! Board-agnostic core of the RC switch Firmata feature
//!
//! This crate contains everything between the Firmata host and the radio
//! driver that does not depend on a specific board:
//!
//! - Collaborator traits (radio driver, Firmata host, feature hooks)
//! - Board pin layout
//! - Per-pin driver registry
//! - Sysex command dispatch and echo replies
//! - Receive reports
//! - Diagnostic events

// proptest and the test doubles need std in unit tests
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod diag;
pub mod dispatch;
pub mod feature;
pub mod registry;
pub mod report;
pub mod traits;

#[cfg(test)]
mod testing;

pub use config::{BoardConfig, ConfigError};
pub use diag::{DiagEvent, DiagnosticSink, NoDiagnostics};
#[cfg(feature = "defmt")]
pub use diag::DefmtDiagnostics;
pub use dispatch::Rejection;
pub use feature::RcSwitchFirmata;
pub use registry::{AttachError, AttachOutcome, PinRegistry, Role};
pub use traits::{FirmataFeature, FirmataHost, RcSwitch};
