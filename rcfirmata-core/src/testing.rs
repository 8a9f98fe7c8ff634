//! Test doubles for the radio driver and the Firmata host

use std::vec::Vec;

use rcfirmata_protocol::encoder7bit::{decode, encoded_len, Encoder7Bit};
use rcfirmata_protocol::messages::RAW_TIMINGS_LEN;
use rcfirmata_protocol::{ReportHeader, SysexMessage, SysexParser};

use crate::traits::{FirmataHost, RcSwitch};

/// A code handed to the driver for transmission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Tristate(Vec<u8>),
    Long { code: u32, bit_count: u16 },
    String(Vec<u8>),
}

/// Radio driver that records every call
#[derive(Debug, Default)]
pub struct MockSwitch {
    pub transmit_pin: Option<u8>,
    pub receive_interrupt: Option<u8>,
    pub protocol: Option<u16>,
    pub pulse_length: Option<u16>,
    pub repeat_transmit: Option<u16>,
    pub tolerance: Option<u16>,
    pub sent: Vec<Sent>,
    pub received: Option<ReportHeader>,
    pub raw: Vec<u16>,
}

impl MockSwitch {
    /// Pretend the interrupt decoded a code
    pub fn inject(&mut self, header: ReportHeader, raw: &[u16]) {
        self.received = Some(header);
        self.raw = raw.to_vec();
    }

    fn last(&self) -> ReportHeader {
        self.received.unwrap_or_default()
    }
}

impl RcSwitch for MockSwitch {
    fn enable_transmit(&mut self, pin: u8) {
        self.transmit_pin = Some(pin);
    }

    fn disable_transmit(&mut self) {
        self.transmit_pin = None;
    }

    fn enable_receive(&mut self, interrupt: u8) {
        self.receive_interrupt = Some(interrupt);
    }

    fn disable_receive(&mut self) {
        self.receive_interrupt = None;
    }

    fn set_protocol(&mut self, protocol: u16) {
        self.protocol = Some(protocol);
    }

    fn set_pulse_length(&mut self, micros: u16) {
        self.pulse_length = Some(micros);
    }

    fn set_repeat_transmit(&mut self, repeat: u16) {
        self.repeat_transmit = Some(repeat);
    }

    fn set_receive_tolerance(&mut self, percent: u16) {
        self.tolerance = Some(percent);
    }

    fn send_tristate(&mut self, code: &[u8]) {
        self.sent.push(Sent::Tristate(code.to_vec()));
    }

    fn send(&mut self, code: u32, bit_count: u16) {
        self.sent.push(Sent::Long { code, bit_count });
    }

    fn send_string(&mut self, code: &[u8]) {
        self.sent.push(Sent::String(code.to_vec()));
    }

    fn available(&self) -> bool {
        self.received.is_some()
    }

    fn received_value(&self) -> u32 {
        self.last().value
    }

    fn received_bit_length(&self) -> u16 {
        self.last().bit_count
    }

    fn received_delay(&self) -> u16 {
        self.last().delay
    }

    fn received_protocol(&self) -> u16 {
        self.last().protocol
    }

    fn received_raw_data(&self, timings: &mut [u16; RAW_TIMINGS_LEN]) {
        timings.fill(0);
        for (slot, &value) in timings.iter_mut().zip(self.raw.iter()) {
            *slot = value;
        }
    }

    fn reset_available(&mut self) {
        self.received = None;
    }
}

/// Firmata host that captures the serial output
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub output: Vec<u8>,
    pub modes: Vec<(u8, u8)>,
    pub inputs: Vec<u8>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mode `pin_mode` reports for `pin`
    pub fn set_mode(&mut self, pin: u8, mode: u8) {
        self.modes.retain(|&(p, _)| p != pin);
        self.modes.push((pin, mode));
    }

    /// Reassemble everything written so far into sysex messages
    pub fn messages(&self) -> Vec<SysexMessage> {
        let mut parser = SysexParser::new();
        self.output
            .iter()
            .filter_map(|&byte| parser.feed(byte).expect("malformed sysex output"))
            .collect()
    }

    /// Forget the output captured so far
    pub fn clear(&mut self) {
        self.output.clear();
    }
}

impl FirmataHost for RecordingHost {
    fn write(&mut self, byte: u8) {
        self.output.push(byte);
    }

    fn pin_mode(&self, pin: u8) -> u8 {
        self.modes
            .iter()
            .find(|&&(p, _)| p == pin)
            .map_or(0, |&(_, mode)| mode)
    }

    fn set_pin_input(&mut self, pin: u8) {
        self.inputs.push(pin);
    }
}

/// Decoded payload of a captured message
pub fn decoded(message: &SysexMessage) -> Vec<u8> {
    let units = message.payload();
    let mut out = vec![0u8; units.len()];
    let len = decode(units, &mut out).expect("decode buffer sized from input");
    out.truncate(len);
    out
}

/// Build `argv` for a sysex message with a raw payload
pub fn argv(subcommand: u8, pin: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + encoded_len(payload.len()));
    out.push(subcommand);
    out.push(pin);
    let mut encoder = Encoder7Bit::new();
    for &byte in payload {
        encoder.write(byte, |unit| out.push(unit));
    }
    encoder.finish(|unit| out.push(unit));
    out
}
