//! Sysex command dispatch
//!
//! Incoming messages are validated in a fixed order and every check
//! short-circuits without side effects:
//!
//! 1. the command id belongs to this feature
//! 2. subcommand and pin are present
//! 3. the host has not reserved the pin (`PIN_MODE_IGNORE`)
//! 4. attach/detach go straight to the registry and are always echoed
//! 5. everything else needs a driver of the feature's role on the pin
//! 6. the payload decodes to at least one byte
//!
//! Subcommand ids resolve through the feature's lookup table to a
//! [`Subcommand`], whose [`Family`] picks the handler. An id missing from
//! the table is still echoed, with the subcommand replaced by
//! `SUB_UNKNOWN`, so the controller sees what was refused.

pub mod input;
pub mod output;
pub mod reply;

use heapless::Vec;
use rcfirmata_protocol::encoder7bit::{self, decoded_len, read_u16_le};
use rcfirmata_protocol::messages::{PIN_MODE_IGNORE, SUB_UNKNOWN};
use rcfirmata_protocol::sysex::MAX_SYSEX_DATA;
use rcfirmata_protocol::{Family, Feature, Subcommand};

use crate::diag::{DiagEvent, DiagnosticSink};
use crate::registry::{PinRegistry, Role};
use crate::traits::{FirmataHost, RcSwitch};

/// Largest decoded payload after subcommand and pin
pub const MAX_PAYLOAD: usize = decoded_len(MAX_SYSEX_DATA - 2);

/// Why a message was dropped without an echo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejection {
    /// Command id belongs to another feature
    WrongCommand,
    /// Subcommand or pin byte missing
    TooShort,
    /// Host reserved the pin
    PinIgnored,
    /// No driver of the required role on the pin
    NotAttached,
    /// Payload decodes to zero bytes
    EmptyPayload,
    /// Payload does not fit the decode buffer
    TooLong,
    /// Payload too short for the subcommand's value
    MissingValue,
}

/// A sysex message addressed to this feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingCommand<'a> {
    /// Output or input side
    pub feature: Feature,
    /// Raw subcommand id as received
    pub subcommand_id: u8,
    /// Target pin
    pub pin: u8,
    /// Still 7-bit encoded payload
    pub units: &'a [u8],
}

impl<'a> IncomingCommand<'a> {
    /// Split `argv` into subcommand, pin and payload
    pub fn parse(command: u8, argv: &'a [u8]) -> Result<Self, Rejection> {
        let feature = Feature::from_command(command).ok_or(Rejection::WrongCommand)?;
        match argv {
            [subcommand_id, pin, units @ ..] => Ok(Self {
                feature,
                subcommand_id: *subcommand_id,
                pin: *pin,
                units,
            }),
            _ => Err(Rejection::TooShort),
        }
    }

    /// Subcommand resolved through the feature's table
    pub fn subcommand(&self) -> Subcommand {
        self.feature.subcommand(self.subcommand_id)
    }

    /// Role a pin must hold for this feature
    pub fn role(&self) -> Role {
        match self.feature {
            Feature::Output => Role::Sender,
            Feature::Input => Role::Receiver,
        }
    }

    /// Number of 8-bit bytes the payload carries
    ///
    /// `units.len()` counts 7-bit units, so this is `floor(units * 7 / 8)`.
    pub fn effective_len(&self) -> usize {
        decoded_len(self.units.len())
    }

    /// Decode the payload into 8-bit bytes
    pub fn decode_payload(&self) -> Result<Payload, Rejection> {
        let len = self.effective_len();
        if len == 0 {
            return Err(Rejection::EmptyPayload);
        }
        if len > MAX_PAYLOAD {
            return Err(Rejection::TooLong);
        }
        let mut bytes = [0u8; MAX_PAYLOAD];
        let len = encoder7bit::decode(self.units, &mut bytes).map_err(|_| Rejection::TooLong)?;
        Ok(Payload { bytes, len })
    }
}

/// Decoded payload bytes
#[derive(Debug, Clone)]
pub struct Payload {
    bytes: [u8; MAX_PAYLOAD],
    len: usize,
}

impl Payload {
    /// Decoded bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Leading little-endian 16-bit parameter
    pub fn value_u16(&self) -> Option<u16> {
        read_u16_le(self.as_slice())
    }

    /// Characters up to the first NUL, or all of them
    pub fn text(&self) -> &[u8] {
        let data = self.as_slice();
        let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        &data[..end]
    }
}

/// Reply mirrored back to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Echo {
    /// Subcommand id, or `SUB_UNKNOWN`
    pub subcommand: u8,
    /// Raw (not yet 7-bit encoded) data
    pub data: Vec<u8, MAX_PAYLOAD>,
}

impl Echo {
    /// Echo `data` under `subcommand`
    pub fn new(subcommand: Subcommand, data: &[u8]) -> Self {
        Self::with_id(subcommand.id(), data)
    }

    /// Echo of a subcommand the feature does not know
    pub fn unknown(data: &[u8]) -> Self {
        Self::with_id(SUB_UNKNOWN, data)
    }

    fn with_id(subcommand: u8, data: &[u8]) -> Self {
        let mut echo = Vec::new();
        for &byte in data.iter().take(MAX_PAYLOAD) {
            let _ = echo.push(byte);
        }
        Self {
            subcommand,
            data: echo,
        }
    }
}

/// Feature-wide state not tied to a pin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Reports carry the raw timing block
    pub raw_data_enabled: bool,
}

/// Routes one message at a time against the registry
pub struct Dispatcher<'a, D, S, const N: usize> {
    registry: &'a mut PinRegistry<D, N>,
    settings: &'a mut Settings,
    sink: &'a mut S,
}

impl<'a, D, S, const N: usize> Dispatcher<'a, D, S, N>
where
    D: RcSwitch + Default,
    S: DiagnosticSink,
{
    /// Borrow the feature state for one dispatch
    pub fn new(
        registry: &'a mut PinRegistry<D, N>,
        settings: &'a mut Settings,
        sink: &'a mut S,
    ) -> Self {
        Self {
            registry,
            settings,
            sink,
        }
    }

    /// Handle a sysex message; returns whether it was handled
    pub fn dispatch<H: FirmataHost>(&mut self, host: &mut H, command: u8, argv: &[u8]) -> bool {
        self.sink.event(&DiagEvent::Received {
            command,
            len: argv.len(),
        });
        match self.route(host, command, argv) {
            Ok(handled) => handled,
            Err(reason) => {
                self.sink.event(&DiagEvent::Rejected { command, reason });
                false
            }
        }
    }

    fn route<H: FirmataHost>(
        &mut self,
        host: &mut H,
        command: u8,
        argv: &[u8],
    ) -> Result<bool, Rejection> {
        let cmd = IncomingCommand::parse(command, argv)?;
        if host.pin_mode(cmd.pin) == PIN_MODE_IGNORE {
            return Err(Rejection::PinIgnored);
        }

        let subcommand = cmd.subcommand();
        if subcommand.family() == Family::Setup {
            return Ok(self.setup(host, &cmd, subcommand));
        }

        let role = cmd.role();
        let driver = self
            .registry
            .driver_mut(cmd.pin, role)
            .ok_or(Rejection::NotAttached)?;
        let payload = cmd.decode_payload()?;

        let echo = match cmd.feature {
            Feature::Output => output::handle(driver, subcommand, &payload)?,
            Feature::Input => input::handle(driver, &mut *self.settings, subcommand, &payload)?,
        };

        if echo.subcommand != SUB_UNKNOWN {
            self.sink.event(&DiagEvent::Dispatched {
                pin: cmd.pin,
                subcommand,
            });
        }
        if subcommand == Subcommand::EnableRawData {
            self.sink
                .event(&DiagEvent::RawDataEnabled(self.settings.raw_data_enabled));
        }

        self.echo(host, cmd.feature, echo.subcommand, cmd.pin, &echo.data);
        Ok(true)
    }

    /// Attach or detach, then echo regardless of the outcome
    fn setup<H: FirmataHost>(
        &mut self,
        host: &mut H,
        cmd: &IncomingCommand<'_>,
        subcommand: Subcommand,
    ) -> bool {
        let (pin, role) = (cmd.pin, cmd.role());
        let success = if subcommand == Subcommand::Attach {
            if role == Role::Receiver && self.registry.interrupt_for(pin).is_some() {
                host.set_pin_input(pin);
            }
            match self.registry.attach(pin, role) {
                Ok(outcome) => {
                    self.sink.event(&DiagEvent::Attached { pin, role, outcome });
                    true
                }
                Err(error) => {
                    self.sink.event(&DiagEvent::AttachFailed { pin, role, error });
                    false
                }
            }
        } else {
            let released = self.registry.detach(pin, role);
            self.sink.event(&DiagEvent::Detached {
                pin,
                role,
                released,
            });
            true
        };

        self.echo(host, cmd.feature, subcommand.id(), pin, &[]);
        success
    }

    fn echo<H: FirmataHost>(
        &mut self,
        host: &mut H,
        feature: Feature,
        subcommand: u8,
        pin: u8,
        data: &[u8],
    ) {
        reply::send_message(host, feature.command(), subcommand, pin, &[data]);
        self.sink.event(&DiagEvent::Echoed {
            feature,
            subcommand,
            pin,
            len: data.len(),
        });
    }
}
