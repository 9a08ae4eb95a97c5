//! Blink playback for the single-indicator mode
//!
//! Transient notifications and the persistent ambient color share one
//! indicator. A blink item expands into at most four timed steps so the
//! indicator always lands back on the ambient color:
//!
//! 1. a black gap when the blink color is already showing,
//! 2. the blink color for the item duration,
//! 3. a black gap when the blink color equals the ambient color,
//! 4. the ambient color for the item sleep (or the default interval).

use embassy_time::{Duration, Instant};
use heapless::Deque;
use log::debug;

use crate::color::PaletteColor;
use crate::queue::BlinkItem;

const MAX_STEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    color: PaletteColor,
    hold: Duration,
}

/// Plays one blink item at a time, driven by the render worker's clock.
#[derive(Debug)]
pub struct BlinkPlayer {
    pending: Deque<Step, MAX_STEPS>,
    /// End of the step currently shown, `None` when idle
    step_deadline: Option<Instant>,
    shown: PaletteColor,
    ambient: PaletteColor,
    interval: Duration,
}

impl BlinkPlayer {
    pub const fn new(interval: Duration) -> Self {
        Self {
            pending: Deque::new(),
            step_deadline: None,
            shown: PaletteColor::Black,
            ambient: PaletteColor::Black,
            interval,
        }
    }

    /// Color currently on the indicator
    pub const fn shown(&self) -> PaletteColor {
        self.shown
    }

    /// Persistent color the indicator returns to after a blink
    pub const fn ambient(&self) -> PaletteColor {
        self.ambient
    }

    pub const fn is_busy(&self) -> bool {
        self.step_deadline.is_some()
    }

    pub const fn next_deadline(&self) -> Option<Instant> {
        self.step_deadline
    }

    /// Forget what is showing, e.g. after the output was blanked externally
    pub fn set_shown(&mut self, color: PaletteColor) {
        self.shown = color;
    }

    /// Begin playing `item` and return the color to show right away
    pub fn start(&mut self, item: BlinkItem, now: Instant) -> PaletteColor {
        if item.is_ambient() {
            debug!("Got an ambient color item, color {}", item.color);
            self.ambient = item.color;
            self.shown = item.color;
            return item.color;
        }

        debug!(
            "Got a blink item, color {}, duration {}ms{}",
            item.color,
            item.duration.as_millis(),
            if item.first_item { " (boot)" } else { "" }
        );

        self.pending.clear();
        if item.color == self.shown && !item.color.is_black() {
            self.push(PaletteColor::Black, self.interval);
        }
        self.push(item.color, item.duration);
        if item.color == self.ambient && !item.color.is_black() {
            self.push(PaletteColor::Black, self.interval);
        }
        let hold = if item.sleep.as_millis() > 0 {
            item.sleep
        } else {
            self.interval
        };
        self.push(self.ambient, hold);

        // pending always holds the blink step at this point
        let first = self.pending.pop_front().unwrap_or(Step {
            color: item.color,
            hold: item.duration,
        });
        self.shown = first.color;
        self.step_deadline = Some(now + first.hold);
        first.color
    }

    /// Move past every step that ended by `now`
    ///
    /// Returns the color to show if it changed. Step deadlines chain from the
    /// previous deadline, not from `now`, so late ticks do not stretch holds.
    pub fn advance(&mut self, now: Instant) -> Option<PaletteColor> {
        let mut changed = None;
        while let Some(deadline) = self.step_deadline {
            if now < deadline {
                break;
            }
            match self.pending.pop_front() {
                Some(step) => {
                    self.shown = step.color;
                    self.step_deadline = Some(deadline + step.hold);
                    changed = Some(step.color);
                }
                None => self.step_deadline = None,
            }
        }
        changed
    }

    fn push(&mut self, color: PaletteColor, hold: Duration) {
        let _ = self.pending.push_back(Step { color, hold });
    }
}
