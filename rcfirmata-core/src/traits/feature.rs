//! Firmata feature plug-in contract

use super::host::FirmataHost;

/// A feature the Firmata host offers messages to
///
/// Each hook returns whether the feature consumed the request so the host
/// can let another feature try it otherwise.
pub trait FirmataFeature<H: FirmataHost> {
    /// A pin mode change was requested
    fn handle_pin_mode(&mut self, host: &mut H, pin: u8, mode: u8) -> bool;

    /// Append this feature's modes for `pin` to a capability response
    fn handle_capability(&mut self, host: &mut H, pin: u8);

    /// A sysex message arrived; `argv` is everything after the command byte
    fn handle_sysex(&mut self, host: &mut H, command: u8, argv: &[u8]) -> bool;

    /// Return to the power-on state
    fn reset(&mut self);

    /// Periodic hook from the host's main loop
    fn report(&mut self, _host: &mut H) {}
}
