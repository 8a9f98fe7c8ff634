//! Diagnostic events
//!
//! The dispatcher and the report loop announce what they do at fixed points.
//! A sink only observes; nothing it does feeds back into command handling.

use rcfirmata_protocol::{Feature, ReportHeader, Subcommand};

use crate::dispatch::Rejection;
use crate::registry::{AttachError, AttachOutcome, Role};

/// Something the feature did or refused to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiagEvent {
    /// A sysex message was offered to the feature
    Received { command: u8, len: usize },
    /// A message was dropped without an echo
    Rejected { command: u8, reason: Rejection },
    /// Attach succeeded
    Attached { pin: u8, role: Role, outcome: AttachOutcome },
    /// Attach failed; the pin is unchanged
    AttachFailed { pin: u8, role: Role, error: AttachError },
    /// Detach was requested
    Detached { pin: u8, role: Role, released: bool },
    /// A driver operation was invoked
    Dispatched { pin: u8, subcommand: Subcommand },
    /// An echo was written to the host
    Echoed { feature: Feature, subcommand: u8, pin: u8, len: usize },
    /// A received code was reported
    Reported { pin: u8, header: ReportHeader, raw: bool },
    /// Raw timing reports were switched
    RawDataEnabled(bool),
    /// All pins were released
    Reset,
}

/// Receiver of diagnostic events
pub trait DiagnosticSink {
    /// Observe one event
    fn event(&mut self, event: &DiagEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl DiagnosticSink for NoDiagnostics {
    #[inline]
    fn event(&mut self, _event: &DiagEvent) {}
}

/// Logs events through defmt
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefmtDiagnostics;

#[cfg(feature = "defmt")]
impl DiagnosticSink for DefmtDiagnostics {
    fn event(&mut self, event: &DiagEvent) {
        match event {
            DiagEvent::Received { command, len } => {
                defmt::trace!("sysex {:#x}, {} bytes", command, len)
            }
            DiagEvent::Rejected { command, reason } => {
                defmt::warn!("sysex {:#x} rejected: {:?}", command, reason)
            }
            DiagEvent::Attached { pin, role, outcome } => {
                defmt::info!("pin {}: {:?} attached ({:?})", pin, role, outcome)
            }
            DiagEvent::AttachFailed { pin, role, error } => {
                defmt::warn!("pin {}: {:?} attach failed: {:?}", pin, role, error)
            }
            DiagEvent::Detached { pin, role, released } => {
                defmt::info!("pin {}: {:?} detached (released: {})", pin, role, released)
            }
            DiagEvent::Dispatched { pin, subcommand } => {
                defmt::debug!("pin {}: {:?}", pin, subcommand)
            }
            DiagEvent::Echoed {
                feature,
                subcommand,
                pin,
                len,
            } => defmt::trace!(
                "echo {:?} sub {:#x} pin {}, {} bytes",
                feature,
                subcommand,
                pin,
                len
            ),
            DiagEvent::Reported { pin, header, raw } => {
                defmt::debug!("pin {}: received {:?} (raw: {})", pin, header, raw)
            }
            DiagEvent::RawDataEnabled(enabled) => defmt::info!("raw data reports: {}", enabled),
            DiagEvent::Reset => defmt::info!("rc switch feature reset"),
        }
    }
}
