use embassy_time::Duration;

use super::Pattern;
use crate::color::{PaletteColor, Rgb};
use crate::math8::wrap_period;

/// Hard 50% duty cycle between two colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPattern {
    on: PaletteColor,
    off: PaletteColor,
    period: Duration,
}

impl BlinkPattern {
    pub const fn new(on: PaletteColor, off: PaletteColor, period: Duration) -> Self {
        Self { on, off, period }
    }
}

impl Pattern for BlinkPattern {
    fn color_at(&self, elapsed: Duration, brightness: u8) -> Rgb {
        let period_ms = self.period.as_millis();
        if period_ms == 0 {
            return self.on.to_rgb(brightness);
        }
        let position = wrap_period(elapsed, self.period).as_millis();
        // first half inclusive of 0, second half up to the period end
        if position * 2 < period_ms {
            self.on.to_rgb(brightness)
        } else {
            self.off.to_rgb(brightness)
        }
    }
}
