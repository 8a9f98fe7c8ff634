//! Receiver-side handlers

use rcfirmata_protocol::Subcommand;

use super::{Echo, Payload, Rejection, Settings};
use crate::traits::RcSwitch;

/// Run an input subcommand against a receiver
///
/// `EnableRawData` changes a feature-wide flag rather than the receiver,
/// but still requires the pin to hold one.
pub fn handle<D: RcSwitch>(
    receiver: &mut D,
    settings: &mut Settings,
    subcommand: Subcommand,
    payload: &Payload,
) -> Result<Echo, Rejection> {
    match subcommand {
        Subcommand::Tolerance => {
            let percent = payload.value_u16().ok_or(Rejection::MissingValue)?;
            receiver.set_receive_tolerance(percent);
        }
        Subcommand::EnableRawData => {
            let flag = payload
                .as_slice()
                .first()
                .ok_or(Rejection::MissingValue)?;
            settings.raw_data_enabled = *flag != 0;
        }
        _ => return Ok(Echo::unknown(payload.as_slice())),
    }
    Ok(Echo::new(subcommand, payload.as_slice()))
}
