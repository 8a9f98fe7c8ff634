//! RCSwitch Firmata Wire Protocol
//!
//! This crate defines the sysex messages a Firmata controller exchanges with
//! the RC switch feature of a microcontroller: attaching senders and
//! receivers to pins, configuring them, sending codes and reporting received
//! codes.
//!
//! # Protocol Overview
//!
//! Messages ride inside Firmata sysex frames:
//! ```text
//! ┌──────┬─────────┬────────────┬─────┬──────────────┬──────┐
//! │ 0xF0 │ COMMAND │ SUBCOMMAND │ PIN │ PAYLOAD      │ 0xF7 │
//! │ 1B   │ 1B      │ 1B         │ 1B  │ 7-bit units  │ 1B   │
//! └──────┴─────────┴────────────┴─────┴──────────────┴──────┘
//! ```
//!
//! Payloads are 8-bit data re-packed into 7-bit units ([`encoder7bit`]).
//! Tristate codes may additionally be packed four symbols per byte
//! ([`tristate`]).

// proptest needs std in unit tests
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod encoder7bit;
pub mod messages;
pub mod sysex;
pub mod tristate;

pub use encoder7bit::{decode, decode_in_place, encode, CodecError, Encoder7Bit};
pub use messages::{Family, Feature, ReportHeader, Subcommand, RCINPUT_DATA, RCOUTPUT_DATA};
pub use sysex::{SysexError, SysexMessage, SysexParser, END_SYSEX, MAX_SYSEX_DATA, START_SYSEX};
pub use tristate::{pack, unpack, Tristate};
