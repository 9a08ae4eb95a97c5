//! Bounded blink queue for `no_std` environments.
//!
//! Multi-producer, single-consumer FIFO built on `critical-section` and
//! `heapless::Deque`. Producers never block: when the queue is full the new
//! item is dropped, since a delayed status blink would be stale anyway.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Duration;
use heapless::Deque;
use log::warn;

use crate::color::PaletteColor;
use crate::error::IndicatorError;

/// Default number of queued blink items
pub const BLINK_QUEUE_CAPACITY: usize = 16;

/// One timed instruction for the single-indicator playback.
///
/// A zero `duration` sets the persistent ambient color instead of blinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkItem {
    pub color: PaletteColor,
    /// How long the color is shown
    pub duration: Duration,
    /// Ambient hold after the blink, zero means the configured interval
    pub sleep: Duration,
    /// First item of a boot-time indication
    pub first_item: bool,
}

impl BlinkItem {
    pub const fn blink(color: PaletteColor, duration: Duration) -> Self {
        Self {
            color,
            duration,
            sleep: Duration::from_millis(0),
            first_item: false,
        }
    }

    /// Persistent ambient color, applied without a timed hold
    pub const fn ambient(color: PaletteColor) -> Self {
        Self::blink(color, Duration::from_millis(0))
    }

    #[must_use]
    pub const fn with_sleep(mut self, sleep: Duration) -> Self {
        self.sleep = sleep;
        self
    }

    #[must_use]
    pub const fn first(mut self) -> Self {
        self.first_item = true;
        self
    }

    pub const fn is_ambient(&self) -> bool {
        self.duration.as_millis() == 0
    }
}

/// A bounded, interrupt-safe blink item queue.
pub struct BlinkQueue<const SIZE: usize = BLINK_QUEUE_CAPACITY> {
    inner: Mutex<RefCell<Deque<BlinkItem, SIZE>>>,
}

impl<const SIZE: usize> BlinkQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Producer handle. Any number may coexist.
    pub const fn sender(&self) -> QueueSender<'_, SIZE> {
        QueueSender { queue: self }
    }

    /// Consumer handle for the render worker.
    pub const fn receiver(&self) -> QueueReceiver<'_, SIZE> {
        QueueReceiver { queue: self }
    }

    /// Append an item, dropping it if the queue is full.
    pub fn try_enqueue(&self, item: BlinkItem) -> Result<(), IndicatorError> {
        let pushed = critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(item).is_ok()
        });
        if pushed {
            Ok(())
        } else {
            warn!("Blink queue full, dropping {} item", item.color);
            Err(IndicatorError::QueueFull)
        }
    }

    pub fn try_dequeue(&self) -> Option<BlinkItem> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front()
        })
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        SIZE
    }
}

impl<const SIZE: usize> Default for BlinkQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle for a [`BlinkQueue`].
#[derive(Clone, Copy)]
pub struct QueueSender<'a, const SIZE: usize> {
    queue: &'a BlinkQueue<SIZE>,
}

impl<const SIZE: usize> QueueSender<'_, SIZE> {
    pub fn try_enqueue(&self, item: BlinkItem) -> Result<(), IndicatorError> {
        self.queue.try_enqueue(item)
    }
}

/// Consumer handle for a [`BlinkQueue`].
#[derive(Clone, Copy)]
pub struct QueueReceiver<'a, const SIZE: usize> {
    queue: &'a BlinkQueue<SIZE>,
}

impl<const SIZE: usize> QueueReceiver<'_, SIZE> {
    pub fn try_dequeue(&self) -> Option<BlinkItem> {
        self.queue.try_dequeue()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
