//! Board pin layout
//!
//! Which pins are digital and which pins can raise an external interrupt.
//! Receivers need an interrupt line, so this table is what attach
//! validation checks on the receive side.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum external interrupt lines per board
pub const MAX_INTERRUPT_LINES: usize = 8;

/// Current board config version
pub const BOARD_CONFIG_VERSION: u8 = 1;

/// Errors that can occur when building or loading a board config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// More interrupt lines than [`MAX_INTERRUPT_LINES`]
    TooManyInterrupts,
    /// Digital range is empty or beyond `total_pins`
    InvalidDigitalRange,
    /// Interrupt line on a pin that is not digital
    InterruptNotDigital,
    /// Blob could not be decoded
    Deserialize,
    /// Blob was written by a different config version
    VersionMismatch,
}

/// External interrupt line wired to a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterruptLine {
    /// Firmata pin number
    pub pin: u8,
    /// Interrupt number handed to the receive driver
    pub interrupt: u8,
}

impl InterruptLine {
    /// Create a new interrupt mapping
    pub const fn new(pin: u8, interrupt: u8) -> Self {
        Self { pin, interrupt }
    }
}

/// ATmega2560 layout; pins 2 and 3 are shared with the Uno
const MEGA_INTERRUPTS: [InterruptLine; 6] = [
    InterruptLine::new(2, 0),
    InterruptLine::new(3, 1),
    InterruptLine::new(21, 2),
    InterruptLine::new(20, 3),
    InterruptLine::new(19, 4),
    InterruptLine::new(18, 5),
];

const UNO_INTERRUPTS: [InterruptLine; 2] = [InterruptLine::new(2, 0), InterruptLine::new(3, 1)];

/// Pin layout of the board the feature runs on
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Number of Firmata pins
    pub total_pins: u8,
    /// First pin usable as digital I/O (0 and 1 are usually the serial port)
    pub first_digital: u8,
    /// Last pin usable as digital I/O (inclusive)
    pub last_digital: u8,
    /// Pins with an external interrupt
    pub interrupts: Vec<InterruptLine, MAX_INTERRUPT_LINES>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::mega()
    }
}

impl BoardConfig {
    /// Create and validate a board description
    pub fn new(
        total_pins: u8,
        first_digital: u8,
        last_digital: u8,
        interrupts: &[InterruptLine],
    ) -> Result<Self, ConfigError> {
        let mut lines = Vec::new();
        lines
            .extend_from_slice(interrupts)
            .map_err(|_| ConfigError::TooManyInterrupts)?;

        let config = Self {
            version: BOARD_CONFIG_VERSION,
            total_pins,
            first_digital,
            last_digital,
            interrupts: lines,
        };
        config.validate()?;
        Ok(config)
    }

    /// Arduino Mega 2560: 70 pins, six interrupt lines
    pub fn mega() -> Self {
        Self::preset(70, 2, 69, &MEGA_INTERRUPTS)
    }

    /// Arduino Uno: 20 pins, two interrupt lines
    pub fn uno() -> Self {
        Self::preset(20, 2, 19, &UNO_INTERRUPTS)
    }

    fn preset(total_pins: u8, first: u8, last: u8, interrupts: &[InterruptLine]) -> Self {
        let mut lines = Vec::new();
        for line in interrupts.iter().take(MAX_INTERRUPT_LINES) {
            let _ = lines.push(*line);
        }
        Self {
            version: BOARD_CONFIG_VERSION,
            total_pins,
            first_digital: first,
            last_digital: last,
            interrupts: lines,
        }
    }

    /// Decode a postcard blob and validate it
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: BoardConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        if config.version != BOARD_CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_digital > self.last_digital || self.last_digital >= self.total_pins {
            return Err(ConfigError::InvalidDigitalRange);
        }
        if self.interrupts.iter().any(|line| !self.is_digital(line.pin)) {
            return Err(ConfigError::InterruptNotDigital);
        }
        Ok(())
    }

    /// Pin can be used as digital I/O
    pub fn is_digital(&self, pin: u8) -> bool {
        (self.first_digital..=self.last_digital).contains(&pin)
    }

    /// Pin can raise an external interrupt
    pub fn is_interrupt(&self, pin: u8) -> bool {
        self.interrupt_for(pin).is_some()
    }

    /// Interrupt number for `pin`, if it has one
    pub fn interrupt_for(&self, pin: u8) -> Option<u8> {
        self.interrupts
            .iter()
            .find(|line| line.pin == pin)
            .map(|line| line.interrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mega_interrupts() {
        let board = BoardConfig::mega();
        assert_eq!(board.interrupt_for(2), Some(0));
        assert_eq!(board.interrupt_for(3), Some(1));
        assert_eq!(board.interrupt_for(21), Some(2));
        assert_eq!(board.interrupt_for(18), Some(5));
        assert_eq!(board.interrupt_for(4), None);
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_uno_layout() {
        let board = BoardConfig::uno();
        assert!(board.is_digital(2));
        assert!(board.is_digital(19));
        assert!(!board.is_digital(0));
        assert!(!board.is_digital(20));
        assert!(!board.is_interrupt(21));
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_default_is_mega() {
        assert_eq!(BoardConfig::default(), BoardConfig::mega());
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(
            BoardConfig::new(10, 5, 2, &[]),
            Err(ConfigError::InvalidDigitalRange)
        );
        assert_eq!(
            BoardConfig::new(10, 2, 10, &[]),
            Err(ConfigError::InvalidDigitalRange)
        );
        assert_eq!(
            BoardConfig::new(10, 2, 9, &[InterruptLine::new(1, 0)]),
            Err(ConfigError::InterruptNotDigital)
        );

        let lines = [InterruptLine::new(2, 0); MAX_INTERRUPT_LINES + 1];
        assert_eq!(
            BoardConfig::new(10, 2, 9, &lines),
            Err(ConfigError::TooManyInterrupts)
        );

        let board = BoardConfig::new(10, 2, 9, &[InterruptLine::new(4, 7)]).unwrap();
        assert_eq!(board.interrupt_for(4), Some(7));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_roundtrip() {
        let board = BoardConfig::uno();
        let mut buffer = [0u8; 64];
        let bytes = postcard::to_slice(&board, &mut buffer).unwrap();
        assert_eq!(BoardConfig::from_postcard(bytes), Ok(board));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_version_mismatch() {
        let mut board = BoardConfig::uno();
        board.version = 9;
        let mut buffer = [0u8; 64];
        let bytes = postcard::to_slice(&board, &mut buffer).unwrap();
        assert_eq!(
            BoardConfig::from_postcard(bytes),
            Err(ConfigError::VersionMismatch)
        );
        assert_eq!(
            BoardConfig::from_postcard(&[0xFF]),
            Err(ConfigError::Deserialize)
        );
    }
}
