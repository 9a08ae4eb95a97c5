//! Render worker and timing.
//!
//! The worker is the only writer of the physical sink. It runs without
//! async or platform timers: the caller invokes [`RenderWorker::tick`] and
//! sleeps for the returned duration, which never exceeds the poll ceiling,
//! so expiry sweeps and animation ticks keep running on an idle queue.
//!
//! # Usage
//!
//! ```ignore
//! let mut worker = RenderWorker::new(sink, &ARBITER, QUEUE.receiver(), &config);
//!
//! loop {
//!     let now = get_current_time_ms();
//!     let result = worker.tick(Instant::from_millis(now));
//!
//!     // Platform-specific sleep
//!     sleep_ms(result.sleep_duration.as_millis());
//! }
//! ```

use embassy_time::{Duration, Instant};
use log::{error, warn};

use crate::LightSink;
use crate::arbiter::StatusArbiter;
use crate::color::{PaletteColor, Rgb};
use crate::config::WidgetConfig;
use crate::error::IndicatorError;
use crate::playback::BlinkPlayer;
use crate::queue::QueueReceiver;

/// Default upper bound on how long the worker may sleep between ticks.
pub const DEFAULT_POLL_CEILING: Duration = Duration::from_millis(50);

/// Default animation frame rate (50 FPS).
pub const DEFAULT_FPS: u64 = 50;

/// Default frame duration while an animation is running.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS);

/// Result of a worker tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// When the worker wants to run next.
    pub next_deadline: Instant,
    /// How long to wait until then (zero if already due).
    pub sleep_duration: Duration,
}

/// Single consumer that plays queued blinks, sweeps expired shares and
/// ticks animations.
pub struct RenderWorker<'a, S: LightSink, const N: usize, const Q: usize> {
    sink: S,
    arbiter: &'a StatusArbiter<N>,
    queue: QueueReceiver<'a, Q>,
    player: BlinkPlayer,
    /// Slot driven by blink playback
    queue_slot: usize,
    poll_ceiling: Duration,
    frame_duration: Duration,
    /// Cleared when the sink was unready at construction
    active: bool,
}

impl<'a, S: LightSink, const N: usize, const Q: usize> RenderWorker<'a, S, N, Q> {
    /// Create a worker over `sink`.
    ///
    /// If the sink is not ready, or cannot address every slot, the error is
    /// logged once and the worker stays inert.
    pub fn new(
        mut sink: S,
        arbiter: &'a StatusArbiter<N>,
        queue: QueueReceiver<'a, Q>,
        config: &WidgetConfig,
    ) -> Self {
        let mut active = true;
        if !sink.is_ready() {
            error!("{}, indicator disabled", IndicatorError::DeviceUnready);
            active = false;
        } else if sink.slot_count() < N || config.queue_slot >= N {
            error!(
                "{}: sink has {} slot(s), {} configured, queue slot {}",
                IndicatorError::InvalidIndex,
                sink.slot_count(),
                N,
                config.queue_slot
            );
            active = false;
        }

        Self {
            sink,
            arbiter,
            queue,
            player: BlinkPlayer::new(config.timings.interval),
            queue_slot: config.queue_slot,
            poll_ceiling: config.timings.poll_ceiling,
            frame_duration: config.timings.frame,
            active,
        }
    }

    /// Whether the worker drives the sink at all
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Color the blink playback currently shows
    pub const fn playback_color(&self) -> PaletteColor {
        self.player.shown()
    }

    /// Persistent color blink playback returns to
    pub const fn ambient_color(&self) -> PaletteColor {
        self.player.ambient()
    }

    pub const fn is_playing(&self) -> bool {
        self.player.is_busy()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Run one cycle and return timing information.
    ///
    /// 1. Advances blink playback, dequeuing the next item when idle
    /// 2. Sweeps expired shares and ticks animations
    /// 3. Writes every changed slot, playback included, to the sink
    pub fn tick(&mut self, now: Instant) -> TickResult {
        if !self.active {
            return self.schedule(now, None, false);
        }

        let mut playback = self.player.advance(now);
        if !self.player.is_busy() {
            if let Some(item) = self.queue.try_dequeue() {
                playback = Some(self.player.start(item, now));
            }
        }

        let queue_slot = self.queue_slot;
        let (updates, sleeping, animating, next_expiry) = self.arbiter.with(|table| {
            table.sweep(now);
            if let Some(color) = playback {
                let _ = table.record_output(queue_slot, color);
            }
            (
                table.render(now),
                table.is_sleeping(),
                table.has_running_animations(),
                table.next_expiry(),
            )
        });

        for (slot, color) in updates {
            self.write(slot, color);
        }

        let deadline = match (self.player.next_deadline(), next_expiry) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.schedule(now, deadline, animating && !sleeping)
    }

    fn write(&mut self, slot: usize, color: Rgb) {
        if let Err(err) = self.sink.set_slot(slot, color) {
            warn!("Failed to update slot {}: {}", slot, err);
        }
    }

    fn schedule(&self, now: Instant, deadline: Option<Instant>, animating: bool) -> TickResult {
        let mut next = now + self.poll_ceiling;
        if animating {
            next = next.min(now + self.frame_duration);
        }
        if let Some(deadline) = deadline {
            next = next.min(deadline.max(now));
        }

        TickResult {
            next_deadline: next,
            sleep_duration: next.saturating_duration_since(now),
        }
    }
}
