//! Configuration types
//!
//! Board description the feature validates pins against. Boards are picked
//! from a preset or decoded from a postcard blob at boot.

pub mod board;

pub use board::*;
