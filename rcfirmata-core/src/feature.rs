//! The RC switch feature as plugged into a Firmata host
//!
//! Owns the pin registry, the feature-wide settings and the diagnostic
//! sink. Each host hook borrows them for the duration of one call; nothing
//! is shared between calls except through this struct.

use rcfirmata_protocol::messages::{CAPABILITY_RESOLUTION, PIN_MODE_RC};

use crate::config::BoardConfig;
use crate::diag::{DiagEvent, DiagnosticSink, NoDiagnostics};
use crate::dispatch::{Dispatcher, Settings};
use crate::registry::{PinRegistry, Role};
use crate::report;
use crate::traits::{FirmataFeature, FirmataHost, RcSwitch};

/// RC output and RC input behind one registry
///
/// `N` is the number of pin slots; size it to the board's pin count.
pub struct RcSwitchFirmata<D, const N: usize, S = NoDiagnostics> {
    registry: PinRegistry<D, N>,
    settings: Settings,
    diagnostics: S,
}

impl<D: RcSwitch + Default, const N: usize> RcSwitchFirmata<D, N> {
    /// Feature without diagnostics
    pub fn new(board: BoardConfig) -> Self {
        Self::with_diagnostics(board, NoDiagnostics)
    }
}

impl<D, const N: usize, S> RcSwitchFirmata<D, N, S>
where
    D: RcSwitch + Default,
    S: DiagnosticSink,
{
    /// Feature reporting to `diagnostics`
    pub fn with_diagnostics(board: BoardConfig, diagnostics: S) -> Self {
        Self {
            registry: PinRegistry::new(board),
            settings: Settings::default(),
            diagnostics,
        }
    }

    pub fn registry(&self) -> &PinRegistry<D, N> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PinRegistry<D, N> {
        &mut self.registry
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn diagnostics(&self) -> &S {
        &self.diagnostics
    }
}

impl<D, H, S, const N: usize> FirmataFeature<H> for RcSwitchFirmata<D, N, S>
where
    D: RcSwitch + Default,
    H: FirmataHost,
    S: DiagnosticSink,
{
    fn handle_pin_mode(&mut self, _host: &mut H, pin: u8, mode: u8) -> bool {
        if !self.registry.board().is_digital(pin) {
            return false;
        }
        if mode != PIN_MODE_RC {
            if self.registry.role(pin) == Some(Role::Sender) {
                let released = self.registry.detach(pin, Role::Sender);
                self.diagnostics.event(&DiagEvent::Detached {
                    pin,
                    role: Role::Sender,
                    released,
                });
            }
            return false;
        }
        match self.registry.attach(pin, Role::Sender) {
            Ok(outcome) => {
                self.diagnostics.event(&DiagEvent::Attached {
                    pin,
                    role: Role::Sender,
                    outcome,
                });
                true
            }
            Err(error) => {
                self.diagnostics.event(&DiagEvent::AttachFailed {
                    pin,
                    role: Role::Sender,
                    error,
                });
                false
            }
        }
    }

    fn handle_capability(&mut self, host: &mut H, pin: u8) {
        if self.registry.contains(pin) && self.registry.board().is_digital(pin) {
            host.write(PIN_MODE_RC);
            host.write(CAPABILITY_RESOLUTION);
        }
    }

    fn handle_sysex(&mut self, host: &mut H, command: u8, argv: &[u8]) -> bool {
        Dispatcher::new(&mut self.registry, &mut self.settings, &mut self.diagnostics)
            .dispatch(host, command, argv)
    }

    fn reset(&mut self) {
        self.registry.reset();
        self.settings = Settings::default();
        self.diagnostics.event(&DiagEvent::Reset);
    }

    fn report(&mut self, host: &mut H) {
        report::report_all(
            &mut self.registry,
            self.settings.raw_data_enabled,
            host,
            &mut self.diagnostics,
        );
    }
}
