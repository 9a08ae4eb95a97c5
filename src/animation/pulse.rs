use core::f32::consts::PI;

use embassy_time::Duration;

use super::Pattern;
use crate::color::{PaletteColor, Rgb, scale_color};
use crate::math8::{unit_to_u8, wrap_period};

/// Sine-wave brightness over one period; hue stays fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulsePattern {
    color: PaletteColor,
    period: Duration,
}

impl PulsePattern {
    pub const fn new(color: PaletteColor, period: Duration) -> Self {
        Self { color, period }
    }

    /// Brightness factor (0-255) at `elapsed`
    #[allow(clippy::cast_precision_loss)]
    pub fn level_at(&self, elapsed: Duration) -> u8 {
        let period_ms = self.period.as_millis();
        if period_ms == 0 {
            return 255;
        }
        let position = wrap_period(elapsed, self.period).as_millis();
        let phase = position as f32 / period_ms as f32;
        unit_to_u8((libm::sinf(2.0 * PI * phase) + 1.0) / 2.0)
    }
}

impl Pattern for PulsePattern {
    fn color_at(&self, elapsed: Duration, brightness: u8) -> Rgb {
        scale_color(self.color.to_rgb(brightness), self.level_at(elapsed))
    }
}
