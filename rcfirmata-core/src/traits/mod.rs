//! Collaborator traits
//!
//! These traits define the interface between the feature logic and the
//! pieces it does not own: the radio driver doing the pulse timing and the
//! Firmata host doing the serial framing.

pub mod feature;
pub mod host;
pub mod rcswitch;

pub use feature::FirmataFeature;
pub use host::FirmataHost;
pub use rcswitch::RcSwitch;
