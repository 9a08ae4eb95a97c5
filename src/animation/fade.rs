use embassy_time::Duration;

use super::Pattern;
use crate::color::{PaletteColor, Rgb};
use crate::math8::{progress8, wrap_period};

/// Linear crossfade from one palette color to another
///
/// A looping fade restarts from `from` every period. A one-shot fade holds
/// `to` once the period has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadePattern {
    from: PaletteColor,
    to: PaletteColor,
    period: Duration,
    looping: bool,
}

impl FadePattern {
    pub const fn new(from: PaletteColor, to: PaletteColor, period: Duration, looping: bool) -> Self {
        Self {
            from,
            to,
            period,
            looping,
        }
    }
}

impl Pattern for FadePattern {
    fn color_at(&self, elapsed: Duration, brightness: u8) -> Rgb {
        let position = if self.looping {
            if self.period.as_millis() == 0 {
                return self.from.to_rgb(brightness);
            }
            wrap_period(elapsed, self.period)
        } else {
            if elapsed >= self.period {
                return self.to.to_rgb(brightness);
            }
            elapsed
        };

        let progress = progress8(position, self.period);
        self.from.lerp(self.to, progress, brightness)
    }
}
