//! Radio driver trait

use rcfirmata_protocol::messages::RAW_TIMINGS_LEN;

/// An RCSwitch-style radio driver bound to one pin
///
/// Implementations handle the pulse timing and GPIO toggling. One instance
/// either transmits or receives, never both at once.
pub trait RcSwitch {
    /// Start driving `pin` as transmitter output
    fn enable_transmit(&mut self, pin: u8);

    /// Stop transmitting and release the pin
    fn disable_transmit(&mut self);

    /// Start decoding pulses from external interrupt `interrupt`
    fn enable_receive(&mut self, interrupt: u8);

    /// Detach the interrupt handler
    fn disable_receive(&mut self);

    /// Select the transmit protocol
    fn set_protocol(&mut self, protocol: u16);

    /// Override the protocol's pulse length in microseconds
    fn set_pulse_length(&mut self, micros: u16);

    /// Number of times each code is repeated
    fn set_repeat_transmit(&mut self, repeat: u16);

    /// Receive timing tolerance in percent (0-100)
    fn set_receive_tolerance(&mut self, percent: u16);

    /// Send a tristate code given as `'0'`/`'F'`/`'1'` characters
    fn send_tristate(&mut self, code: &[u8]);

    /// Send the low `bit_count` bits of `code`
    fn send(&mut self, code: u32, bit_count: u16);

    /// Send a code given as `'0'`/`'1'` characters
    fn send_string(&mut self, code: &[u8]);

    /// A received code is waiting
    fn available(&self) -> bool;

    /// Value of the last received code
    fn received_value(&self) -> u32;

    /// Bit length of the last received code
    fn received_bit_length(&self) -> u16;

    /// Pulse length of the last received code in microseconds
    fn received_delay(&self) -> u16;

    /// Protocol of the last received code
    fn received_protocol(&self) -> u16;

    /// Copy the pulse intervals of the last received code
    ///
    /// The buffer is written from the receive interrupt. It may change while
    /// it is being copied, so the result is a best-effort snapshot.
    fn received_raw_data(&self, timings: &mut [u16; RAW_TIMINGS_LEN]);

    /// Mark the last received code as consumed
    fn reset_available(&mut self);
}
