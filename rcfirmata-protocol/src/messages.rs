//! Command and subcommand identifiers for the RC sysex messages
//!
//! Two sysex commands share one subcommand namespace:
//! - RC output (`0x5C`): attach/detach senders, configure them, send codes
//! - RC input (`0x5D`): attach/detach receivers, configure them, report codes
//!
//! Every message body has the same shape:
//! ```text
//! ┌─────────┬────────────┬─────┬──────────────────────┐
//! │ COMMAND │ SUBCOMMAND │ PIN │ PAYLOAD (7-bit enc.) │
//! └─────────┴────────────┴─────┴──────────────────────┘
//! ```

/// Sysex command: send RC data
pub const RCOUTPUT_DATA: u8 = 0x5C;
/// Sysex command: receive RC data
pub const RCINPUT_DATA: u8 = 0x5D;

// Subcommands shared by both commands
pub const SUB_UNKNOWN: u8 = 0x00;
pub const SUB_ATTACH: u8 = 0x01;
pub const SUB_DETACH: u8 = 0x02;

// Output subcommands
pub const SUB_PROTOCOL: u8 = 0x11;
pub const SUB_PULSE_LENGTH: u8 = 0x12;
pub const SUB_REPEAT_TRANSMIT: u8 = 0x14;
pub const SUB_CODE_TRISTATE: u8 = 0x21;
pub const SUB_CODE_LONG: u8 = 0x22;
pub const SUB_CODE_CHAR: u8 = 0x24;
pub const SUB_CODE_TRISTATE_PACKED: u8 = 0x28;

// Input subcommands
pub const SUB_TOLERANCE: u8 = 0x31;
pub const SUB_ENABLE_RAW_DATA: u8 = 0x32;
pub const SUB_MESSAGE: u8 = 0x41;

/// Pin mode advertised for RC capable pins
pub const PIN_MODE_RC: u8 = 0x0A;
/// Pin mode of pins reserved by the host (serial, etc.)
pub const PIN_MODE_IGNORE: u8 = 0x7F;

/// Capability resolution: 12 tristate symbols at 7 bits each
/// (5 group + 5 device + 2 switch symbols)
pub const CAPABILITY_RESOLUTION: u8 = 84;

/// Pulse intervals captured per received code
pub const RAW_TIMINGS_LEN: usize = 67;

/// Size of the fixed report block
pub const REPORT_HEADER_LEN: usize = 10;

/// Size of the optional raw timing block
pub const RAW_BLOCK_LEN: usize = 2 * RAW_TIMINGS_LEN;

/// The sysex command a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feature {
    /// Transmit side, pins hold senders
    Output,
    /// Receive side, pins hold receivers
    Input,
}

/// Which handler family a subcommand is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Family {
    /// Attach or detach a driver instance
    Setup,
    /// Change a driver or feature setting
    Configure,
    /// Send a code
    Transmit,
    /// Outbound received-code report
    Report,
    /// Not recognized by the feature
    Unknown,
}

/// Every subcommand either command understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Subcommand {
    Unknown,
    Attach,
    Detach,
    Protocol,
    PulseLength,
    RepeatTransmit,
    CodeTristate,
    CodeLong,
    CodeChar,
    CodeTristatePacked,
    Tolerance,
    EnableRawData,
    Message,
}

/// Subcommands accepted on [`RCOUTPUT_DATA`]
const OUTPUT_SUBCOMMANDS: &[(u8, Subcommand)] = &[
    (SUB_ATTACH, Subcommand::Attach),
    (SUB_DETACH, Subcommand::Detach),
    (SUB_PROTOCOL, Subcommand::Protocol),
    (SUB_PULSE_LENGTH, Subcommand::PulseLength),
    (SUB_REPEAT_TRANSMIT, Subcommand::RepeatTransmit),
    (SUB_CODE_TRISTATE, Subcommand::CodeTristate),
    (SUB_CODE_LONG, Subcommand::CodeLong),
    (SUB_CODE_CHAR, Subcommand::CodeChar),
    (SUB_CODE_TRISTATE_PACKED, Subcommand::CodeTristatePacked),
];

/// Subcommands accepted on [`RCINPUT_DATA`]
///
/// `Message` is outbound only and deliberately absent.
const INPUT_SUBCOMMANDS: &[(u8, Subcommand)] = &[
    (SUB_ATTACH, Subcommand::Attach),
    (SUB_DETACH, Subcommand::Detach),
    (SUB_TOLERANCE, Subcommand::Tolerance),
    (SUB_ENABLE_RAW_DATA, Subcommand::EnableRawData),
];

impl Feature {
    /// Map a sysex command id to a feature
    pub fn from_command(command: u8) -> Option<Self> {
        match command {
            RCOUTPUT_DATA => Some(Feature::Output),
            RCINPUT_DATA => Some(Feature::Input),
            _ => None,
        }
    }

    /// Sysex command id of this feature
    pub fn command(self) -> u8 {
        match self {
            Feature::Output => RCOUTPUT_DATA,
            Feature::Input => RCINPUT_DATA,
        }
    }

    fn table(self) -> &'static [(u8, Subcommand)] {
        match self {
            Feature::Output => OUTPUT_SUBCOMMANDS,
            Feature::Input => INPUT_SUBCOMMANDS,
        }
    }

    /// Resolve a subcommand id; ids outside this feature's table are `Unknown`
    pub fn subcommand(self, id: u8) -> Subcommand {
        self.table()
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map_or(Subcommand::Unknown, |(_, sub)| *sub)
    }
}

impl Subcommand {
    /// Wire id
    pub fn id(self) -> u8 {
        match self {
            Subcommand::Unknown => SUB_UNKNOWN,
            Subcommand::Attach => SUB_ATTACH,
            Subcommand::Detach => SUB_DETACH,
            Subcommand::Protocol => SUB_PROTOCOL,
            Subcommand::PulseLength => SUB_PULSE_LENGTH,
            Subcommand::RepeatTransmit => SUB_REPEAT_TRANSMIT,
            Subcommand::CodeTristate => SUB_CODE_TRISTATE,
            Subcommand::CodeLong => SUB_CODE_LONG,
            Subcommand::CodeChar => SUB_CODE_CHAR,
            Subcommand::CodeTristatePacked => SUB_CODE_TRISTATE_PACKED,
            Subcommand::Tolerance => SUB_TOLERANCE,
            Subcommand::EnableRawData => SUB_ENABLE_RAW_DATA,
            Subcommand::Message => SUB_MESSAGE,
        }
    }

    /// Handler family this subcommand is routed to
    pub fn family(self) -> Family {
        match self {
            Subcommand::Attach | Subcommand::Detach => Family::Setup,
            Subcommand::Protocol
            | Subcommand::PulseLength
            | Subcommand::RepeatTransmit
            | Subcommand::Tolerance
            | Subcommand::EnableRawData => Family::Configure,
            Subcommand::CodeTristate
            | Subcommand::CodeLong
            | Subcommand::CodeChar
            | Subcommand::CodeTristatePacked => Family::Transmit,
            Subcommand::Message => Family::Report,
            Subcommand::Unknown => Family::Unknown,
        }
    }
}

/// A code read from a receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportHeader {
    /// Decoded code value
    pub value: u32,
    /// Number of valid bits in `value`
    pub bit_count: u16,
    /// Pulse length in microseconds
    pub delay: u16,
    /// Protocol the receiver matched
    pub protocol: u16,
}

impl ReportHeader {
    /// Serialize as the fixed big-endian report block
    pub fn to_bytes(&self) -> [u8; REPORT_HEADER_LEN] {
        let mut out = [0u8; REPORT_HEADER_LEN];
        out[0..4].copy_from_slice(&self.value.to_be_bytes());
        out[4..6].copy_from_slice(&self.bit_count.to_be_bytes());
        out[6..8].copy_from_slice(&self.delay.to_be_bytes());
        out[8..10].copy_from_slice(&self.protocol.to_be_bytes());
        out
    }

    /// Parse the fixed report block (used by controllers and tests)
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < REPORT_HEADER_LEN {
            return None;
        }
        Some(Self {
            value: u32::from_be_bytes([data[0], data[1], data[2], data[3]]),
            bit_count: u16::from_be_bytes([data[4], data[5]]),
            delay: u16::from_be_bytes([data[6], data[7]]),
            protocol: u16::from_be_bytes([data[8], data[9]]),
        })
    }
}
