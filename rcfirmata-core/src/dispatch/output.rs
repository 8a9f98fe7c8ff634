//! Sender-side handlers
//!
//! Configure subcommands take a little-endian 16-bit value. Transmit
//! subcommands echo exactly the code that was handed to the driver, so the
//! controller can compare request and echo.

use rcfirmata_protocol::encoder7bit::{read_u16_le, read_u32_le};
use rcfirmata_protocol::tristate;
use rcfirmata_protocol::Subcommand;

use super::{Echo, Payload, Rejection, MAX_PAYLOAD};
use crate::traits::RcSwitch;

/// Bytes consumed by a long code: 2 bytes bit count + 4 bytes code
const LONG_CODE_LEN: usize = 6;

/// Largest unpacked tristate code
const MAX_SYMBOLS: usize = MAX_PAYLOAD * tristate::SYMBOLS_PER_BYTE;

/// Run an output subcommand against a sender
pub fn handle<D: RcSwitch>(
    sender: &mut D,
    subcommand: Subcommand,
    payload: &Payload,
) -> Result<Echo, Rejection> {
    match subcommand {
        Subcommand::Protocol | Subcommand::PulseLength | Subcommand::RepeatTransmit => {
            let value = payload.value_u16().ok_or(Rejection::MissingValue)?;
            match subcommand {
                Subcommand::Protocol => sender.set_protocol(value),
                Subcommand::PulseLength => sender.set_pulse_length(value),
                _ => sender.set_repeat_transmit(value),
            }
            Ok(Echo::new(subcommand, payload.as_slice()))
        }
        Subcommand::CodeTristate => {
            let code = non_empty(payload.text())?;
            sender.send_tristate(code);
            Ok(Echo::new(subcommand, code))
        }
        Subcommand::CodeChar => {
            let code = non_empty(payload.text())?;
            sender.send_string(code);
            Ok(Echo::new(subcommand, code))
        }
        Subcommand::CodeLong => {
            let data = payload.as_slice();
            if data.len() < LONG_CODE_LEN {
                return Err(Rejection::MissingValue);
            }
            let bit_count = read_u16_le(data).ok_or(Rejection::MissingValue)?;
            let code = read_u32_le(&data[2..]).ok_or(Rejection::MissingValue)?;
            sender.send(code, bit_count);
            Ok(Echo::new(subcommand, &data[..LONG_CODE_LEN]))
        }
        Subcommand::CodeTristatePacked => send_packed_tristate(sender, payload),
        _ => Ok(Echo::unknown(payload.as_slice())),
    }
}

/// Unpack, send, and re-pack for the echo
///
/// Trailing reserved symbols are padding from packing and are not sent.
/// Reserved symbols inside the code go to the driver as the sentinel
/// character so a corrupted symbol does not abort the whole code.
fn send_packed_tristate<D: RcSwitch>(sender: &mut D, payload: &Payload) -> Result<Echo, Rejection> {
    let mut symbols = [0u8; MAX_SYMBOLS];
    let count =
        tristate::unpack(payload.as_slice(), &mut symbols).map_err(|_| Rejection::TooLong)?;
    let code = non_empty(tristate::strip_padding(&symbols[..count]))?;
    sender.send_tristate(code);

    let mut packed = [0u8; MAX_PAYLOAD];
    let len = tristate::pack(code, &mut packed).map_err(|_| Rejection::TooLong)?;
    Ok(Echo::new(Subcommand::CodeTristatePacked, &packed[..len]))
}

fn non_empty(code: &[u8]) -> Result<&[u8], Rejection> {
    if code.is_empty() {
        Err(Rejection::MissingValue)
    } else {
        Ok(code)
    }
}
