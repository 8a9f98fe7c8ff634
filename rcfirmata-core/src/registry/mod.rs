//! Per-pin driver ownership
//!
//! Every pin holds at most one radio driver, either as sender or as
//! receiver. The registry creates the driver on attach and destroys it on
//! detach or reset; nothing else keeps a driver past that point.
//!
//! ```text
//!              attach(Sender)              attach(Receiver)
//! Unattached ─────────────────▶ Sender    Unattached ────────────────▶ Receiver
//!     ▲                            │           ▲                           │
//!     └──────── detach(Sender) ────┘           └──── detach(Receiver) ─────┘
//! ```
//!
//! Attaching a pin that already holds the other role replaces the old
//! driver (last attach wins). Attaching the same role again is a no-op.

use crate::config::BoardConfig;
use crate::traits::RcSwitch;

/// Function assigned to a pin's driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Transmits codes
    Sender,
    /// Decodes codes from an interrupt line
    Receiver,
}

/// Content of a single pin slot
#[derive(Debug)]
pub enum PinSlot<D> {
    Unattached,
    Sender(D),
    Receiver(D),
}

impl<D> Default for PinSlot<D> {
    fn default() -> Self {
        PinSlot::Unattached
    }
}

impl<D> PinSlot<D> {
    /// Role of the attached driver, if any
    pub fn role(&self) -> Option<Role> {
        match self {
            PinSlot::Unattached => None,
            PinSlot::Sender(_) => Some(Role::Sender),
            PinSlot::Receiver(_) => Some(Role::Receiver),
        }
    }
}

/// Reasons an attach is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttachError {
    /// Pin number beyond the board or registry size
    PinOutOfRange,
    /// Pin cannot drive a transmitter
    NotDigital,
    /// Pin has no external interrupt for a receiver
    NoInterrupt,
}

/// What a successful attach did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttachOutcome {
    /// A driver was created on an empty pin
    Created,
    /// The pin already held this role; nothing changed
    Reused,
    /// A driver of the other role was destroyed and replaced
    Replaced,
}

/// Fixed-capacity table of pin slots
///
/// `N` is the number of slots compiled in; pins at or above
/// `min(N, board.total_pins)` are out of range.
pub struct PinRegistry<D, const N: usize> {
    board: BoardConfig,
    slots: [PinSlot<D>; N],
}

impl<D: RcSwitch + Default, const N: usize> PinRegistry<D, N> {
    /// Create a registry with every pin unattached
    pub fn new(board: BoardConfig) -> Self {
        Self {
            board,
            slots: core::array::from_fn(|_| PinSlot::Unattached),
        }
    }

    /// Board layout pins are validated against
    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    /// Number of addressable pins
    pub fn pin_count(&self) -> usize {
        N.min(usize::from(self.board.total_pins))
    }

    /// Pin can be addressed at all
    pub fn contains(&self, pin: u8) -> bool {
        usize::from(pin) < self.pin_count()
    }

    /// Interrupt line a receiver on `pin` would use
    pub fn interrupt_for(&self, pin: u8) -> Option<u8> {
        if !self.contains(pin) {
            return None;
        }
        self.board.interrupt_for(pin)
    }

    /// Role currently attached to `pin`
    pub fn role(&self, pin: u8) -> Option<Role> {
        self.slot(pin).and_then(PinSlot::role)
    }

    /// Number of pins holding a driver
    pub fn attached_count(&self) -> usize {
        self.slots.iter().filter(|s| s.role().is_some()).count()
    }

    /// Attach a driver of `role` to `pin`
    ///
    /// Validation happens before any state is touched, so a failed attach
    /// leaves the pin exactly as it was.
    pub fn attach(&mut self, pin: u8, role: Role) -> Result<AttachOutcome, AttachError> {
        if !self.contains(pin) {
            return Err(AttachError::PinOutOfRange);
        }
        if !self.board.is_digital(pin) {
            return Err(AttachError::NotDigital);
        }
        let interrupt = match role {
            Role::Sender => None,
            Role::Receiver => Some(
                self.board
                    .interrupt_for(pin)
                    .ok_or(AttachError::NoInterrupt)?,
            ),
        };

        let slot = &mut self.slots[usize::from(pin)];
        let outcome = match slot.role() {
            Some(current) if current == role => return Ok(AttachOutcome::Reused),
            Some(_) => {
                release(slot);
                AttachOutcome::Replaced
            }
            None => AttachOutcome::Created,
        };

        let mut driver = D::default();
        *slot = match interrupt {
            None => {
                driver.enable_transmit(pin);
                PinSlot::Sender(driver)
            }
            Some(interrupt) => {
                driver.enable_receive(interrupt);
                PinSlot::Receiver(driver)
            }
        };
        Ok(outcome)
    }

    /// Destroy the driver on `pin` if it has `role`
    ///
    /// Returns whether a driver was released. Detaching an unattached pin,
    /// or a pin holding the other role, changes nothing.
    pub fn detach(&mut self, pin: u8, role: Role) -> bool {
        match self.slot_mut(pin) {
            Some(slot) if slot.role() == Some(role) => {
                release(slot);
                true
            }
            _ => false,
        }
    }

    /// Detach every sender on a digital pin and every receiver on an
    /// interrupt pin
    pub fn reset(&mut self) {
        for pin in 0..self.pin_count() {
            let pin = pin as u8;
            let eligible = match self.role(pin) {
                Some(Role::Sender) => self.board.is_digital(pin),
                Some(Role::Receiver) => self.board.is_interrupt(pin),
                None => false,
            };
            if eligible {
                release(&mut self.slots[usize::from(pin)]);
            }
        }
    }

    /// Driver on `pin` if it holds `role`
    pub fn driver_mut(&mut self, pin: u8, role: Role) -> Option<&mut D> {
        match (self.slot_mut(pin)?, role) {
            (PinSlot::Sender(driver), Role::Sender) => Some(driver),
            (PinSlot::Receiver(driver), Role::Receiver) => Some(driver),
            _ => None,
        }
    }

    /// Every receiver with its pin number
    pub fn receivers_mut(&mut self) -> impl Iterator<Item = (u8, &mut D)> + '_ {
        let count = self.pin_count();
        self.slots
            .iter_mut()
            .take(count)
            .enumerate()
            .filter_map(|(pin, slot)| match slot {
                PinSlot::Receiver(driver) => Some((pin as u8, driver)),
                _ => None,
            })
    }

    fn slot(&self, pin: u8) -> Option<&PinSlot<D>> {
        if !self.contains(pin) {
            return None;
        }
        self.slots.get(usize::from(pin))
    }

    fn slot_mut(&mut self, pin: u8) -> Option<&mut PinSlot<D>> {
        if !self.contains(pin) {
            return None;
        }
        self.slots.get_mut(usize::from(pin))
    }
}

/// Stop the driver and clear the slot
fn release<D: RcSwitch>(slot: &mut PinSlot<D>) {
    match core::mem::take(slot) {
        PinSlot::Sender(mut driver) => driver.disable_transmit(),
        PinSlot::Receiver(mut driver) => driver.disable_receive(),
        PinSlot::Unattached => {}
    }
}
