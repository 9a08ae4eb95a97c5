//! Single-slot delayed action
//!
//! Each scheduling replaces the pending value and pushes the deadline out to
//! `now + delay`, so only the last value of a burst is ever delivered. This
//! is not a queue: at most one action is pending per debouncer.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Coalesces bursts of events into one delivery after a quiet period.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Mutex<RefCell<Option<Pending<T>>>>,
}

impl<T> Debouncer<T> {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(RefCell::new(None)),
        }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)schedule delivery of `value`
    ///
    /// Returns `true` if a pending value was superseded.
    pub fn schedule(&self, value: T, now: Instant) -> bool {
        let deadline = now + self.delay;
        critical_section::with(|cs| {
            self.pending
                .borrow(cs)
                .replace(Some(Pending { value, deadline }))
                .is_some()
        })
    }

    /// Drop the pending value, if any
    pub fn cancel(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).take().is_some())
    }

    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).borrow().is_some())
    }

    /// When the pending value becomes due
    pub fn deadline(&self) -> Option<Instant> {
        critical_section::with(|cs| {
            self.pending
                .borrow(cs)
                .borrow()
                .as_ref()
                .map(|pending| pending.deadline)
        })
    }

    /// Take the pending value once its quiet period has passed
    pub fn poll(&self, now: Instant) -> Option<T> {
        critical_section::with(|cs| {
            let mut slot = self.pending.borrow(cs).borrow_mut();
            if slot.as_ref().is_some_and(|pending| pending.deadline <= now) {
                slot.take().map(|pending| pending.value)
            } else {
                None
            }
        })
    }
}
