//! Outbound sysex messages

use rcfirmata_protocol::Encoder7Bit;

use crate::traits::FirmataHost;

/// Write `[command, subcommand, pin, blocks…]` as one sysex message
///
/// The blocks are concatenated and 7-bit encoded as a single binary
/// stream, so an empty trailing block adds nothing to the wire. With no
/// blocks at all the message carries only subcommand and pin.
pub fn send_message<H: FirmataHost>(
    host: &mut H,
    command: u8,
    subcommand: u8,
    pin: u8,
    blocks: &[&[u8]],
) {
    host.start_sysex(command);
    host.write(subcommand);
    host.write(pin);
    let mut encoder = Encoder7Bit::new();
    for &byte in blocks.iter().flat_map(|block| block.iter()) {
        encoder.write(byte, |unit| host.write(unit));
    }
    encoder.finish(|unit| host.write(unit));
    host.end_sysex();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHost;
    use rcfirmata_protocol::sysex::{END_SYSEX, START_SYSEX};

    #[test]
    fn test_message_without_payload() {
        let mut host = RecordingHost::new();
        send_message(&mut host, 0x5C, 0x01, 0x02, &[]);
        assert_eq!(host.output, [START_SYSEX, 0x5C, 0x01, 0x02, END_SYSEX]);
    }

    #[test]
    fn test_blocks_share_one_stream() {
        let mut joined = RecordingHost::new();
        send_message(&mut joined, 0x5D, 0x41, 0x02, &[&[1, 2, 3, 4]]);

        let mut split = RecordingHost::new();
        send_message(&mut split, 0x5D, 0x41, 0x02, &[&[1, 2], &[3, 4], &[]]);

        assert_eq!(joined.output, split.output);
        // 4 raw bytes need 5 units
        assert_eq!(joined.output.len(), 4 + 5 + 1);
    }
}
