//! Slot arbitration
//!
//! [`SlotTable`] holds the slot arena and implements assignment, preemption,
//! release and expiry. [`StatusArbiter`] wraps it in a critical-section
//! mutex so producers and the render worker can share one instance.
//!
//! Preemption rule: a slot held at [`Priority::CRITICAL_BATTERY`] is never
//! taken by another status. Otherwise a request wins if it is strictly more
//! urgent, or equally urgent while the slot is already shared.
//!
//! [`Priority::CRITICAL_BATTERY`]: crate::status::Priority::CRITICAL_BATTERY

mod slot;
mod table;

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;

pub use slot::Slot;
pub use table::{SlotList, SlotTable, SlotUpdates};

use crate::animation::AnimationDescriptor;
use crate::error::IndicatorError;
use crate::status::{ArbitrationRequest, StatusKind};

/// Slot table shared between event producers and the render worker.
pub struct StatusArbiter<const N: usize> {
    table: Mutex<RefCell<SlotTable<N>>>,
}

impl<const N: usize> StatusArbiter<N> {
    pub const fn new() -> Self {
        Self {
            table: Mutex::new(RefCell::new(SlotTable::new())),
        }
    }

    /// Run `f` with exclusive access to the slot table
    pub fn with<R>(&self, f: impl FnOnce(&mut SlotTable<N>) -> R) -> R {
        critical_section::with(|cs| {
            let mut table = self.table.borrow(cs).borrow_mut();
            f(&mut table)
        })
    }

    pub fn assign(&self, request: &ArbitrationRequest, now: Instant) -> Result<usize, IndicatorError> {
        self.with(|table| table.assign(request, now))
    }

    pub fn release(&self, kind: StatusKind) -> usize {
        self.with(|table| table.release(kind))
    }

    pub fn set_pattern(
        &self,
        slot: usize,
        descriptor: AnimationDescriptor,
        now: Instant,
    ) -> Result<(), IndicatorError> {
        self.with(|table| table.set_pattern(slot, descriptor, now))
    }

    pub fn set_brightness(&self, brightness: u8) {
        self.with(|table| table.set_brightness(brightness));
    }

    pub fn brightness(&self) -> u8 {
        self.with(|table| table.brightness())
    }

    pub const fn slot_count(&self) -> usize {
        N
    }

    pub fn set_slot_mapping(&self, kind: StatusKind, slot: usize) -> Result<(), IndicatorError> {
        self.with(|table| table.set_slot_mapping(kind, slot))
    }

    /// Drop the dedicated slot of `kind`; it then borrows slots from the ring
    pub fn clear_slot_mapping(&self, kind: StatusKind) {
        self.with(|table| table.clear_slot_mapping(kind));
    }

    pub fn slot_mapping(&self, kind: StatusKind) -> Option<usize> {
        self.with(|table| table.slot_mapping(kind))
    }

    pub fn set_fallbacks(&self, kind: StatusKind, order: &[usize]) -> Result<(), IndicatorError> {
        self.with(|table| table.set_fallbacks(kind, order))
    }

    /// Copy of the slot state at `index`
    pub fn slot(&self, index: usize) -> Result<Slot, IndicatorError> {
        self.with(|table| table.slot(index).copied())
    }

    pub fn set_sleeping(&self, sleeping: bool) {
        self.with(|table| table.set_sleeping(sleeping));
    }

    pub fn is_sleeping(&self) -> bool {
        self.with(|table| table.is_sleeping())
    }
}

impl<const N: usize> Default for StatusArbiter<N> {
    fn default() -> Self {
        Self::new()
    }
}
