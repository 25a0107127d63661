//! EQ band automation.
//!
//! The tone control and graphic EQ band registers must not jump: the chip
//! clicks unless a band moves by at most 0.5 dB (two raw units) at a time.
//! [`Automation`] holds one [`RampSlot`] per band. Setters record a target;
//! [`Automation::advance`], called periodically by the host, moves every
//! pending band one step and writes it.
//!
//! `advance` is not reentrant. All calls into one `Automation` must come
//! from the thread that owns the driver; only the optional busy flag may be
//! read from elsewhere.

use core::sync::atomic::{AtomicBool, Ordering};

use platform::RegisterPort;

use crate::codec::Band;
use crate::registers::EQ_BAND_0DB;

/// Largest change per [`Automation::advance`] call, in raw units (0.5 dB).
pub const STEP: u8 = 2;

/// Ramp state for one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampSlot {
    /// Value last written to the chip.
    pub current: u8,
    /// Value the ramp is heading to. Equals `current` when idle.
    pub target: u8,
    /// A step is owed on the next advance.
    pub pending: bool,
}

impl RampSlot {
    const fn idle(value: u8) -> Self {
        Self {
            current: value,
            target: value,
            pending: false,
        }
    }

    /// The value after one step toward `target`, never overshooting.
    pub fn next_value(&self) -> u8 {
        if self.target > self.current {
            self.current.saturating_add(STEP).min(self.target)
        } else {
            self.current.saturating_sub(STEP).max(self.target)
        }
    }
}

/// What a non-forced request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Written immediately (forced).
    Written,
    /// Target recorded; `advance` will ramp to it.
    Scheduled,
    /// Already at the target; any in-flight ramp was cancelled.
    Unchanged,
}

/// Per-band ramp state machine.
#[derive(Debug)]
pub struct Automation {
    slots: [RampSlot; 5],
    busy: Option<&'static AtomicBool>,
}

impl Default for Automation {
    fn default() -> Self {
        Self::new()
    }
}

impl Automation {
    /// All bands idle at the reset value (0 dB).
    pub const fn new() -> Self {
        Self {
            slots: [RampSlot::idle(EQ_BAND_0DB); 5],
            busy: None,
        }
    }

    /// Mirror [`Automation::any_pending`] into `flag` after every change,
    /// for status readers outside the owning thread.
    pub fn with_busy_flag(flag: &'static AtomicBool) -> Self {
        let automation = Self {
            busy: Some(flag),
            ..Self::new()
        };
        automation.publish();
        automation
    }

    /// Snapshot of one band's slot.
    pub fn slot(&self, band: Band) -> RampSlot {
        self.slots
            .get(band.index())
            .copied()
            .unwrap_or(RampSlot::idle(EQ_BAND_0DB))
    }

    /// True while any band still owes a step.
    pub fn any_pending(&self) -> bool {
        self.slots.iter().any(|s| s.pending)
    }

    fn slot_mut(&mut self, band: Band) -> Option<&mut RampSlot> {
        self.slots.get_mut(band.index())
    }

    fn publish(&self) {
        if let Some(flag) = self.busy {
            flag.store(self.any_pending(), Ordering::Release);
        }
    }

    /// Read every band register and make it the idle value of its slot.
    ///
    /// Drops any pending ramps. Stops at the first failed read; bands
    /// already read keep their new value.
    pub fn sync_from_device<P: RegisterPort>(&mut self, port: &mut P) -> Result<(), P::Error> {
        let result = Band::ALL.iter().try_for_each(|&band| {
            let raw = port.read_register(band.register())?;
            let value = u8::try_from(raw & 0x7F).unwrap_or(EQ_BAND_0DB);
            if let Some(slot) = self.slot_mut(band) {
                *slot = RampSlot::idle(value);
            }
            Ok(())
        });
        self.publish();
        result
    }

    /// Ask for `band` to reach `target`.
    ///
    /// With `force` the value is written at once and any ramp on the band
    /// is dropped; if that write fails the slot is left as it was. Without
    /// `force` nothing is written: a target equal to the current value
    /// cancels the ramp, anything else (re)targets it.
    pub fn request_target<P: RegisterPort>(
        &mut self,
        port: &mut P,
        band: Band,
        target: u8,
        force: bool,
    ) -> Result<Request, P::Error> {
        let outcome = if force {
            port.write_register(band.register(), u16::from(target))?;
            if let Some(slot) = self.slot_mut(band) {
                *slot = RampSlot::idle(target);
            }
            debug!("eq band {} forced to {}", band.index(), target);
            Request::Written
        } else {
            match self.slot_mut(band) {
                Some(slot) if slot.current == target => {
                    *slot = RampSlot::idle(target);
                    Request::Unchanged
                }
                Some(slot) => {
                    slot.target = target;
                    slot.pending = true;
                    debug!(
                        "eq band {} ramp {} -> {}",
                        band.index(),
                        slot.current,
                        target
                    );
                    Request::Scheduled
                }
                None => Request::Unchanged,
            }
        };
        self.publish();
        Ok(outcome)
    }

    /// Move every pending band one step and write it.
    ///
    /// Returns the number of register writes issued; zero when idle. A
    /// failed write stops the pass: that band and every band after it stay
    /// pending at their pre-advance values for the next call.
    pub fn advance<P: RegisterPort>(&mut self, port: &mut P) -> Result<usize, P::Error> {
        let mut writes = 0usize;
        for band in Band::ALL {
            let Some(slot) = self.slot_mut(band) else {
                continue;
            };
            if !slot.pending {
                continue;
            }
            let next = slot.next_value();
            if let Err(err) = port.write_register(band.register(), u16::from(next)) {
                warn!("eq band {} ramp write failed", band.index());
                self.publish();
                return Err(err);
            }
            slot.current = next;
            slot.pending = next != slot.target;
            writes = writes.saturating_add(1);
            trace!("eq band {} stepped to {}", band.index(), next);
        }
        self.publish();
        Ok(writes)
    }

    /// Drop a pending ramp, leaving the band at its current value.
    pub fn cancel(&mut self, band: Band) {
        if let Some(slot) = self.slot_mut(band) {
            slot.target = slot.current;
            slot.pending = false;
        }
        self.publish();
    }
}
