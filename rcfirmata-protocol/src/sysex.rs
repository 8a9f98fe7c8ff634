//! Sysex framing as done by the Firmata host transport.
//!
//! Frame format:
//! - START_SYSEX (1 byte): 0xF0
//! - COMMAND (1 byte): feature command id
//! - DATA (0-192 bytes): 7-bit data bytes
//! - END_SYSEX (1 byte): 0xF7
//!
//! The feature itself only ever sees the unwrapped command and data. This
//! module lets a host (or a test harness standing in for one) build and
//! reassemble the frames around them.

use heapless::Vec;

/// Frame start byte
pub const START_SYSEX: u8 = 0xF0;

/// Frame end byte
pub const END_SYSEX: u8 = 0xF7;

/// Largest sysex body handled, large enough for a report with raw timings
pub const MAX_SYSEX_DATA: usize = 192;

/// Largest complete frame (START + COMMAND + DATA + END)
pub const MAX_MESSAGE_SIZE: usize = 1 + 1 + MAX_SYSEX_DATA + 1;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SysexError {
    /// Body exceeds [`MAX_SYSEX_DATA`]
    DataTooLarge,
    /// A body byte has its high bit set
    NotDataByte,
    /// A new START_SYSEX arrived before END_SYSEX
    Interrupted,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A sysex message without its framing bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysexMessage {
    /// Feature command id
    pub command: u8,
    /// 7-bit body
    pub data: Vec<u8, MAX_SYSEX_DATA>,
}

impl SysexMessage {
    /// Create a message with the given command and body
    pub fn new(command: u8, data: &[u8]) -> Result<Self, SysexError> {
        if data.iter().any(|b| b & 0x80 != 0) {
            return Err(SysexError::NotDataByte);
        }
        let mut body = Vec::new();
        body.extend_from_slice(data)
            .map_err(|_| SysexError::DataTooLarge)?;
        Ok(Self {
            command,
            data: body,
        })
    }

    /// Subcommand byte, if present
    pub fn subcommand(&self) -> Option<u8> {
        self.data.first().copied()
    }

    /// Pin byte, if present
    pub fn pin(&self) -> Option<u8> {
        self.data.get(1).copied()
    }

    /// Everything after subcommand and pin
    pub fn payload(&self) -> &[u8] {
        self.data.get(2..).unwrap_or(&[])
    }

    /// Encode this message into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, SysexError> {
        let frame_len = 3 + self.data.len();
        if buffer.len() < frame_len {
            return Err(SysexError::BufferTooSmall);
        }

        buffer[0] = START_SYSEX;
        buffer[1] = self.command;
        buffer[2..2 + self.data.len()].copy_from_slice(&self.data);
        buffer[2 + self.data.len()] = END_SYSEX;

        Ok(frame_len)
    }

    /// Encode this message into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_MESSAGE_SIZE>, SysexError> {
        let mut buffer = [0u8; MAX_MESSAGE_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| SysexError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// State machine for reassembling sysex frames from a byte stream
#[derive(Debug, Clone)]
pub struct SysexParser {
    state: ParseState,
    buffer: Vec<u8, MAX_SYSEX_DATA>,
    command: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for START_SYSEX
    WaitingForStart,
    /// Got START_SYSEX, waiting for the command byte
    WaitingForCommand,
    /// Reading body bytes until END_SYSEX
    ReadingData,
}

impl Default for SysexParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SysexParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            buffer: Vec::new(),
            command: 0,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.buffer.clear();
        self.command = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(message))` when END_SYSEX completes a message,
    /// `Ok(None)` when more bytes are needed, or `Err` on a broken frame.
    pub fn feed(&mut self, byte: u8) -> Result<Option<SysexMessage>, SysexError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == START_SYSEX {
                    self.state = ParseState::WaitingForCommand;
                }
                // Non-sysex traffic is not ours
                Ok(None)
            }
            ParseState::WaitingForCommand => {
                if byte == START_SYSEX {
                    return Ok(None);
                }
                if byte & 0x80 != 0 {
                    self.reset();
                    return Err(SysexError::NotDataByte);
                }
                self.command = byte;
                self.buffer.clear();
                self.state = ParseState::ReadingData;
                Ok(None)
            }
            ParseState::ReadingData => match byte {
                END_SYSEX => {
                    let message = SysexMessage {
                        command: self.command,
                        data: self.buffer.clone(),
                    };
                    self.reset();
                    Ok(Some(message))
                }
                START_SYSEX => {
                    self.reset();
                    self.state = ParseState::WaitingForCommand;
                    Err(SysexError::Interrupted)
                }
                b if b & 0x80 != 0 => {
                    self.reset();
                    Err(SysexError::NotDataByte)
                }
                b => {
                    if self.buffer.push(b).is_err() {
                        self.reset();
                        return Err(SysexError::DataTooLarge);
                    }
                    Ok(None)
                }
            },
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete message found, if any.
    /// Remaining bytes after a complete message are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<SysexMessage>, SysexError> {
        for &byte in bytes {
            if let Some(message) = self.feed(byte)? {
                return Ok(Some(message));
            }
        }
        Ok(None)
    }
}
