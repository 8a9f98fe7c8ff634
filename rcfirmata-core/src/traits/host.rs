//! Firmata host transport trait

use rcfirmata_protocol::sysex::{END_SYSEX, START_SYSEX};

/// The Firmata host the feature is plugged into
///
/// The host owns the serial channel and the pin mode table.
pub trait FirmataHost {
    /// Write one raw byte to the channel
    fn write(&mut self, byte: u8);

    /// Pin mode currently configured for `pin`
    fn pin_mode(&self, pin: u8) -> u8;

    /// Configure `pin` as a plain digital input
    fn set_pin_input(&mut self, pin: u8);

    /// Open a sysex message for `command`
    fn start_sysex(&mut self, command: u8) {
        self.write(START_SYSEX);
        self.write(command);
    }

    /// Close the current sysex message
    fn end_sysex(&mut self) {
        self.write(END_SYSEX);
    }
}
