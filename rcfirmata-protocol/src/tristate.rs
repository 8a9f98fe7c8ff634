//! Tristate code packing
//!
//! Tristate codes are sequences of the symbols `'0'`, `'F'` and `'1'`.
//! On the wire they are packed four symbols per byte, two bits per symbol,
//! most significant pair first:
//!
//! ```text
//! byte:   [ s0 s0 | s1 s1 | s2 s2 | s3 s3 ]
//!           bit 7                   bit 0
//! ```
//!
//! The fourth 2-bit code is reserved. It pads the last byte of an odd-sized
//! code and unpacks to [`RESERVED_CHAR`], so corrupted symbols stay visible
//! instead of silently turning into `'0'`.

use crate::encoder7bit::CodecError;

/// 2-bit code for symbol `'0'`
pub const TRISTATE_0: u8 = 0x00;
/// 2-bit code for symbol `'F'`
pub const TRISTATE_F: u8 = 0x01;
/// 2-bit code that is not a symbol
pub const TRISTATE_RESERVED: u8 = 0x02;
/// 2-bit code for symbol `'1'`
pub const TRISTATE_1: u8 = 0x03;

/// Character produced when a reserved code is unpacked
pub const RESERVED_CHAR: u8 = b'X';

/// Symbols carried by one packed byte
pub const SYMBOLS_PER_BYTE: usize = 4;

/// A single tristate symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tristate {
    /// Logic low
    Zero,
    /// Floating (open)
    Floating,
    /// Logic high
    One,
    /// Padding or corrupted symbol
    Reserved,
}

impl Tristate {
    /// Decode a 2-bit field (upper bits are ignored)
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            TRISTATE_0 => Tristate::Zero,
            TRISTATE_F => Tristate::Floating,
            TRISTATE_1 => Tristate::One,
            _ => Tristate::Reserved,
        }
    }

    /// 2-bit wire code
    pub fn bits(self) -> u8 {
        match self {
            Tristate::Zero => TRISTATE_0,
            Tristate::Floating => TRISTATE_F,
            Tristate::One => TRISTATE_1,
            Tristate::Reserved => TRISTATE_RESERVED,
        }
    }

    /// Parse a symbol character; anything unknown becomes `Reserved`
    pub fn from_char(c: u8) -> Self {
        match c {
            b'0' => Tristate::Zero,
            b'F' => Tristate::Floating,
            b'1' => Tristate::One,
            _ => Tristate::Reserved,
        }
    }

    /// Character representation as understood by the radio driver
    pub fn to_char(self) -> u8 {
        match self {
            Tristate::Zero => b'0',
            Tristate::Floating => b'F',
            Tristate::One => b'1',
            Tristate::Reserved => RESERVED_CHAR,
        }
    }
}

/// Number of bytes needed to pack `symbols` symbols
pub const fn packed_len(symbols: usize) -> usize {
    (symbols + SYMBOLS_PER_BYTE - 1) / SYMBOLS_PER_BYTE
}

/// Read the symbol at `index` (0..=3) of a packed byte
pub fn symbol_at(byte: u8, index: usize) -> Tristate {
    let shift = 6 - 2 * (index & 0x03);
    Tristate::from_bits(byte >> shift)
}

/// Return `byte` with the symbol at `index` (0..=3) replaced
pub fn with_symbol(byte: u8, index: usize, symbol: Tristate) -> u8 {
    let shift = 6 - 2 * (index & 0x03);
    let clear = !(0x03u8 << shift);
    (byte & clear) | (symbol.bits() << shift)
}

/// Expand packed bytes into symbol characters
///
/// Writes `4 * bytes.len()` characters and returns that count.
pub fn unpack(bytes: &[u8], symbols: &mut [u8]) -> Result<usize, CodecError> {
    let count = bytes.len() * SYMBOLS_PER_BYTE;
    if symbols.len() < count {
        return Err(CodecError::BufferTooSmall);
    }
    for (i, slot) in symbols.iter_mut().take(count).enumerate() {
        *slot = symbol_at(bytes[i / SYMBOLS_PER_BYTE], i).to_char();
    }
    Ok(count)
}

/// Pack symbol characters, padding the last byte with the reserved code
///
/// Returns the number of bytes written, `packed_len(symbols.len())`.
pub fn pack(symbols: &[u8], bytes: &mut [u8]) -> Result<usize, CodecError> {
    let count = packed_len(symbols.len());
    if bytes.len() < count {
        return Err(CodecError::BufferTooSmall);
    }
    for (i, byte) in bytes.iter_mut().take(count).enumerate() {
        let mut packed = 0u8;
        for slot in 0..SYMBOLS_PER_BYTE {
            let symbol = symbols
                .get(i * SYMBOLS_PER_BYTE + slot)
                .map_or(Tristate::Reserved, |&c| Tristate::from_char(c));
            packed = with_symbol(packed, slot, symbol);
        }
        *byte = packed;
    }
    Ok(count)
}

/// Drop trailing reserved characters left over from pack padding
pub fn strip_padding(symbols: &[u8]) -> &[u8] {
    let end = symbols
        .iter()
        .rposition(|&c| c != RESERVED_CHAR)
        .map_or(0, |last| last + 1);
    &symbols[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pack_full_byte() {
        let mut out = [0u8; 1];
        assert_eq!(pack(b"01F0", &mut out), Ok(1));
        assert_eq!(out[0], 0b00_11_01_00);
    }

    #[test]
    fn test_unpack_full_byte() {
        let mut symbols = [0u8; 4];
        assert_eq!(unpack(&[0x34], &mut symbols), Ok(4));
        assert_eq!(&symbols, b"01F0");
    }

    #[test]
    fn test_pack_pads_with_reserved() {
        let mut out = [0u8; 2];
        assert_eq!(pack(b"1F1F0", &mut out), Ok(2));
        assert_eq!(out[0], 0b11_01_11_01);
        assert_eq!(out[1], 0b00_10_10_10);
    }

    #[test]
    fn test_unknown_char_packs_as_reserved() {
        let mut out = [0u8; 1];
        pack(b"0Z10", &mut out).unwrap();
        assert_eq!(symbol_at(out[0], 1), Tristate::Reserved);

        let mut symbols = [0u8; 4];
        unpack(&out, &mut symbols).unwrap();
        assert_eq!(&symbols, b"0X10");
    }

    #[test]
    fn test_symbol_accessors() {
        let byte = with_symbol(0xFF, 2, Tristate::Zero);
        assert_eq!(byte, 0b11_11_00_11);
        assert_eq!(symbol_at(byte, 0), Tristate::One);
        assert_eq!(symbol_at(byte, 2), Tristate::Zero);
    }

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(0), 0);
        assert_eq!(packed_len(1), 1);
        assert_eq!(packed_len(4), 1);
        assert_eq!(packed_len(12), 3);
        assert_eq!(packed_len(13), 4);
    }

    #[test]
    fn test_buffers_too_small() {
        let mut out = [0u8; 1];
        assert_eq!(pack(b"01F01", &mut out), Err(CodecError::BufferTooSmall));
        let mut symbols = [0u8; 7];
        assert_eq!(unpack(&[0, 0], &mut symbols), Err(CodecError::BufferTooSmall));
    }

    #[test]
    fn test_strip_padding() {
        assert_eq!(strip_padding(b"01FXXX"), b"01F");
        assert_eq!(strip_padding(b"0X1"), b"0X1");
        assert_eq!(strip_padding(b"XXXX"), b"");
    }

    fn symbol_strategy() -> impl Strategy<Value = u8> {
        prop_oneof![Just(b'0'), Just(b'F'), Just(b'1')]
    }

    proptest! {
        #[test]
        fn prop_symbols_survive_packing(code in proptest::collection::vec(symbol_strategy(), 0..48)) {
            let mut packed = [0u8; 12];
            let written = pack(&code, &mut packed).unwrap();
            prop_assert_eq!(written, (code.len() + 3) / 4);

            let mut symbols = [0u8; 48];
            let count = unpack(&packed[..written], &mut symbols).unwrap();
            prop_assert_eq!(&symbols[..code.len()], code.as_slice());
            prop_assert!(symbols[code.len()..count].iter().all(|&c| c == RESERVED_CHAR));
        }

        #[test]
        fn prop_repacking_is_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..12)) {
            let mut symbols = [0u8; 48];
            let count = unpack(&bytes, &mut symbols).unwrap();
            let mut once = [0u8; 12];
            let len = pack(&symbols[..count], &mut once).unwrap();

            let count = unpack(&once[..len], &mut symbols).unwrap();
            let mut twice = [0u8; 12];
            let len2 = pack(&symbols[..count], &mut twice).unwrap();

            prop_assert_eq!(&once[..len], &twice[..len2]);
            // Each 2-bit field is either a symbol or the single reserved code
            prop_assert_eq!(&once[..len], bytes.as_slice());
        }
    }
}
