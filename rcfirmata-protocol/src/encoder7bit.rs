//! 7-bit transport encoding used inside sysex messages.
//!
//! Sysex data bytes must keep their high bit clear, so 8-bit payloads are
//! re-packed into 7-bit units. The bit order matches Firmata's `Encoder7Bit`:
//! every raw byte is laid into the 7-bit stream least significant bit first.
//!
//! ```text
//! raw:     aaaaaaaa bbbbbbbb
//! encoded: 0aaaaaaa 0bbbbbba 000000bb
//! ```

use heapless::Vec;

/// Errors that can occur while encoding or decoding payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Output buffer cannot hold the result
    BufferTooSmall,
}

/// Number of raw bytes carried by `encoded` 7-bit units
pub const fn decoded_len(encoded: usize) -> usize {
    (encoded * 7) >> 3
}

/// Number of 7-bit units needed to carry `raw` bytes
pub const fn encoded_len(raw: usize) -> usize {
    (raw * 8 + 6) / 7
}

/// Decode one raw byte starting at bit `i * 8` of the 7-bit stream.
///
/// Caller guarantees that `i < decoded_len(input.len())`.
#[inline]
fn decode_byte(input: &[u8], i: usize) -> u8 {
    let bit = i << 3;
    let pos = bit / 7;
    let shift = (bit % 7) as u32;
    let low = u16::from(input[pos] & 0x7F) >> shift;
    let high = u16::from(input[pos + 1] & 0x7F) << (7 - shift);
    (low | high) as u8
}

/// Decode a 7-bit stream into `output`
///
/// Returns the number of raw bytes written, always `decoded_len(input.len())`.
pub fn decode(input: &[u8], output: &mut [u8]) -> Result<usize, CodecError> {
    let len = decoded_len(input.len());
    if output.len() < len {
        return Err(CodecError::BufferTooSmall);
    }
    for (i, out) in output.iter_mut().take(len).enumerate() {
        *out = decode_byte(input, i);
    }
    Ok(len)
}

/// Decode a 7-bit stream in place
///
/// Raw byte `i` only depends on encoded bytes at index `i` or later, so the
/// front of the buffer can be overwritten while decoding proceeds.
/// Returns the number of raw bytes now at the start of `buf`.
pub fn decode_in_place(buf: &mut [u8]) -> usize {
    let len = decoded_len(buf.len());
    for i in 0..len {
        let byte = decode_byte(buf, i);
        buf[i] = byte;
    }
    len
}

/// Streaming encoder, one raw byte at a time.
///
/// Mirrors the begin/write/end sequence a Firmata host uses when writing a
/// reply directly to the wire without an intermediate buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder7Bit {
    shift: u8,
    previous: u8,
}

impl Encoder7Bit {
    /// Start a new binary block
    pub const fn new() -> Self {
        Self {
            shift: 0,
            previous: 0,
        }
    }

    /// Encode one raw byte, emitting one or two 7-bit units
    pub fn write(&mut self, byte: u8, mut emit: impl FnMut(u8)) {
        if self.shift == 0 {
            emit(byte & 0x7F);
            self.shift = 1;
            self.previous = byte >> 7;
        } else {
            emit(((byte << self.shift) & 0x7F) | self.previous);
            if self.shift == 6 {
                emit(byte >> 1);
                self.shift = 0;
            } else {
                self.shift += 1;
                self.previous = byte >> (8 - self.shift);
            }
        }
    }

    /// Flush the pending partial unit, if any
    pub fn finish(self, mut emit: impl FnMut(u8)) {
        if self.shift > 0 {
            emit(self.previous);
        }
    }
}

/// Encode raw bytes into a bounded 7-bit buffer
pub fn encode<const N: usize>(input: &[u8], output: &mut Vec<u8, N>) -> Result<(), CodecError> {
    if output.capacity() - output.len() < encoded_len(input.len()) {
        return Err(CodecError::BufferTooSmall);
    }
    let mut encoder = Encoder7Bit::new();
    // Capacity was checked above, pushes cannot fail
    for &byte in input {
        encoder.write(byte, |unit| {
            let _ = output.push(unit);
        });
    }
    encoder.finish(|unit| {
        let _ = output.push(unit);
    });
    Ok(())
}

/// Read a little-endian `u16` from the start of a decoded payload
pub fn read_u16_le(data: &[u8]) -> Option<u16> {
    match data {
        [b0, b1, ..] => Some(u16::from_le_bytes([*b0, *b1])),
        _ => None,
    }
}

/// Read a little-endian `u32` from the start of a decoded payload
pub fn read_u32_le(data: &[u8]) -> Option<u32> {
    match data {
        [b0, b1, b2, b3, ..] => Some(u32::from_le_bytes([*b0, *b1, *b2, *b3])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decoded_len() {
        assert_eq!(decoded_len(0), 0);
        assert_eq!(decoded_len(1), 0);
        assert_eq!(decoded_len(2), 1);
        assert_eq!(decoded_len(3), 2);
        assert_eq!(decoded_len(8), 7);
        assert_eq!(decoded_len(9), 7);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(0), 0);
        assert_eq!(encoded_len(1), 2);
        assert_eq!(encoded_len(2), 3);
        assert_eq!(encoded_len(7), 8);
        assert_eq!(encoded_len(10), 12);
    }

    #[test]
    fn test_encode_pulse_length() {
        // 350 = 0x015E, little-endian on the wire
        let mut out = Vec::<u8, 8>::new();
        encode(&350u16.to_le_bytes(), &mut out).unwrap();
        assert_eq!(out.as_slice(), &[0x5E, 0x02, 0x00]);
    }

    #[test]
    fn test_decode_pulse_length() {
        let mut out = [0u8; 4];
        let len = decode(&[0x5E, 0x02, 0x00], &mut out).unwrap();
        assert_eq!(len, 2);
        assert_eq!(read_u16_le(&out[..len]), Some(350));
    }

    #[test]
    fn test_high_bit_survives() {
        let mut out = Vec::<u8, 8>::new();
        encode(&[0xFF], &mut out).unwrap();
        assert_eq!(out.as_slice(), &[0x7F, 0x01]);
        assert!(out.iter().all(|b| b & 0x80 == 0));
    }

    #[test]
    fn test_decode_in_place() {
        let raw = [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x80];
        let mut encoded = Vec::<u8, 16>::new();
        encode(&raw, &mut encoded).unwrap();

        let len = decode_in_place(&mut encoded);
        assert_eq!(len, raw.len());
        assert_eq!(&encoded[..len], &raw);
    }

    #[test]
    fn test_decode_buffer_too_small() {
        let mut out = [0u8; 1];
        assert_eq!(
            decode(&[0x5E, 0x02, 0x00], &mut out),
            Err(CodecError::BufferTooSmall)
        );
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut out = Vec::<u8, 2>::new();
        assert_eq!(encode(&[1, 2], &mut out), Err(CodecError::BufferTooSmall));
        assert!(out.is_empty());
    }

    #[test]
    fn test_streaming_matches_buffered() {
        let raw = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        let mut buffered = Vec::<u8, 16>::new();
        encode(&raw, &mut buffered).unwrap();

        let mut streamed = Vec::<u8, 16>::new();
        let mut encoder = Encoder7Bit::new();
        for &byte in &raw {
            encoder.write(byte, |u| streamed.push(u).unwrap());
        }
        encoder.finish(|u| streamed.push(u).unwrap());

        assert_eq!(buffered, streamed);
    }

    #[test]
    fn test_read_integers_need_enough_bytes() {
        assert_eq!(read_u16_le(&[0x01]), None);
        assert_eq!(read_u16_le(&[0x01, 0x02]), Some(0x0201));
        assert_eq!(read_u32_le(&[0x01, 0x02, 0x03]), None);
        assert_eq!(read_u32_le(&[0x01, 0x02, 0x03, 0x04, 0xFF]), Some(0x0403_0201));
    }

    proptest! {
        #[test]
        fn prop_whole_blocks_roundtrip(
            units in (1usize..=6).prop_flat_map(|blocks| proptest::collection::vec(0u8..0x80, blocks * 8))
        ) {
            // Every 8 units carry exactly 7 raw bytes, so no padding bits are lost
            let mut raw = [0u8; 64];
            let len = decode(&units, &mut raw).unwrap();
            prop_assert_eq!(len, units.len() * 7 / 8);

            let mut reencoded = Vec::<u8, 64>::new();
            encode(&raw[..len], &mut reencoded).unwrap();
            prop_assert_eq!(reencoded.as_slice(), units.as_slice());
        }

        #[test]
        fn prop_raw_bytes_survive_encoding(raw in proptest::collection::vec(any::<u8>(), 0..48)) {
            let mut encoded = Vec::<u8, 64>::new();
            encode(&raw, &mut encoded).unwrap();
            prop_assert_eq!(encoded.len(), encoded_len(raw.len()));
            prop_assert!(encoded.iter().all(|b| b & 0x80 == 0));

            let mut decoded = [0u8; 64];
            let len = decode(&encoded, &mut decoded).unwrap();
            prop_assert_eq!(&decoded[..len], raw.as_slice());
        }
    }
}
