//! Startup indication sequence
//!
//! Battery first, once the gauge reports a level or the retries run out.
//! Connectivity and the initial layer color follow after the battery blink
//! had time to play. Until then status events only update cached state.

use embassy_time::{Duration, Instant};
use log::{debug, info};

use crate::config::WidgetConfig;

/// What the indicator must do next during startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootAction {
    /// Show the battery level read so far
    IndicateBattery,
    /// Show connectivity and the layer color, then accept live events
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    NotStarted,
    ReadingBattery { attempt: u8, next: Instant },
    Settling { until: Instant },
    Done,
}

/// Poll-driven startup state machine
#[derive(Debug, Clone, Copy)]
pub struct BootSequence {
    stage: Stage,
    retries: u8,
    retry_interval: Duration,
    settle: Duration,
    read_battery: bool,
}

impl BootSequence {
    pub const fn new(config: &WidgetConfig) -> Self {
        let settle = Duration::from_ticks(
            config.timings.battery_blink.as_ticks() + config.timings.interval.as_ticks(),
        );
        Self {
            stage: Stage::NotStarted,
            retries: config.battery.boot_retries,
            retry_interval: config.battery.boot_retry_interval,
            settle,
            read_battery: config.battery.enabled,
        }
    }

    pub const fn is_started(&self) -> bool {
        !matches!(self.stage, Stage::NotStarted)
    }

    pub const fn is_done(&self) -> bool {
        matches!(self.stage, Stage::Done)
    }

    /// Begin the sequence. Has no effect once started.
    pub fn start(&mut self, now: Instant) {
        if self.is_started() {
            return;
        }
        self.stage = if self.read_battery {
            info!("Indicating initial battery status");
            Stage::ReadingBattery { attempt: 0, next: now }
        } else {
            Stage::Settling { until: now }
        };
    }

    /// When the sequence wants to be polled again
    pub const fn next_deadline(&self) -> Option<Instant> {
        match self.stage {
            Stage::ReadingBattery { next, .. } => Some(next),
            Stage::Settling { until } => Some(until),
            Stage::NotStarted | Stage::Done => None,
        }
    }

    /// Advance with the latest cached battery level
    pub fn poll(&mut self, now: Instant, battery_level: u8) -> Option<BootAction> {
        match self.stage {
            Stage::ReadingBattery { attempt, next } if now >= next => {
                if battery_level == 0 && attempt < self.retries {
                    debug!("Battery level not ready, retry {}", attempt + 1);
                    self.stage = Stage::ReadingBattery {
                        attempt: attempt + 1,
                        next: now + self.retry_interval,
                    };
                    None
                } else {
                    self.stage = Stage::Settling {
                        until: now + self.settle,
                    };
                    Some(BootAction::IndicateBattery)
                }
            }
            Stage::Settling { until } if now >= until => {
                self.stage = Stage::Done;
                Some(BootAction::Complete)
            }
            _ => None,
        }
    }
}
