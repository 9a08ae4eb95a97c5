//! Animation system with compile-time known pattern variants
//!
//! A slot carries at most one [`Animation`]: the descriptor it was set from,
//! the resolved [`PatternSlot`] and the epoch captured when it was set.
//! Output is always recomputed from `now - epoch`, never from a tick count,
//! so playback does not depend on tick jitter.

mod blink;
mod fade;
mod pulse;

use embassy_time::{Duration, Instant};
use log::warn;

pub use blink::BlinkPattern;
pub use fade::FadePattern;
pub use pulse::PulsePattern;

use crate::color::{PaletteColor, Rgb};

pub trait Pattern {
    /// Color shown `elapsed` after the pattern started
    fn color_at(&self, elapsed: Duration, brightness: u8) -> Rgb;
}

/// Known animation kinds.
///
/// `Wave` and `Rainbow` are reserved: they are accepted but render as
/// `Static`. [`AnimationKind::is_supported`] reports this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    Static,
    Blink,
    Pulse,
    Fade,
    Wave,
    Rainbow,
}

impl AnimationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Blink => "blink",
            Self::Pulse => "pulse",
            Self::Fade => "fade",
            Self::Wave => "wave",
            Self::Rainbow => "rainbow",
        }
    }

    /// Whether the kind renders as described rather than degrading to static
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Wave | Self::Rainbow)
    }
}

/// What a slot should animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationDescriptor {
    pub kind: AnimationKind,
    pub period: Duration,
    pub start_color: PaletteColor,
    pub end_color: PaletteColor,
    pub looping: bool,
}

impl AnimationDescriptor {
    pub const fn new(
        kind: AnimationKind,
        period: Duration,
        start_color: PaletteColor,
        end_color: PaletteColor,
        looping: bool,
    ) -> Self {
        Self {
            kind,
            period,
            start_color,
            end_color,
            looping,
        }
    }

    pub const fn static_color(color: PaletteColor) -> Self {
        Self::new(
            AnimationKind::Static,
            Duration::from_millis(0),
            color,
            color,
            false,
        )
    }

    pub const fn blink(on: PaletteColor, off: PaletteColor, period: Duration) -> Self {
        Self::new(AnimationKind::Blink, period, on, off, true)
    }

    pub const fn pulse(color: PaletteColor, period: Duration) -> Self {
        Self::new(AnimationKind::Pulse, period, color, color, true)
    }

    pub const fn fade(
        from: PaletteColor,
        to: PaletteColor,
        period: Duration,
        looping: bool,
    ) -> Self {
        Self::new(AnimationKind::Fade, period, from, to, looping)
    }

    /// Resolve the descriptor into the pattern that renders it
    pub fn to_pattern(self) -> PatternSlot {
        match self.kind {
            AnimationKind::Static | AnimationKind::Wave | AnimationKind::Rainbow => {
                PatternSlot::Static(self.start_color)
            }
            AnimationKind::Blink => PatternSlot::Blink(BlinkPattern::new(
                self.start_color,
                self.end_color,
                self.period,
            )),
            AnimationKind::Pulse => {
                PatternSlot::Pulse(PulsePattern::new(self.start_color, self.period))
            }
            AnimationKind::Fade => PatternSlot::Fade(FadePattern::new(
                self.start_color,
                self.end_color,
                self.period,
                self.looping,
            )),
        }
    }
}

/// Pattern slot - enum containing all renderable patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSlot {
    Static(PaletteColor),
    Blink(BlinkPattern),
    Pulse(PulsePattern),
    Fade(FadePattern),
}

impl PatternSlot {
    pub fn color_at(&self, elapsed: Duration, brightness: u8) -> Rgb {
        match self {
            Self::Static(color) => color.to_rgb(brightness),
            Self::Blink(pattern) => pattern.color_at(elapsed, brightness),
            Self::Pulse(pattern) => pattern.color_at(elapsed, brightness),
            Self::Fade(pattern) => pattern.color_at(elapsed, brightness),
        }
    }

    pub const fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

/// A pattern attached to a slot, anchored at the instant it was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    descriptor: AnimationDescriptor,
    pattern: PatternSlot,
    epoch: Instant,
}

impl Animation {
    pub fn new(descriptor: AnimationDescriptor, now: Instant) -> Self {
        if !descriptor.kind.is_supported() {
            warn!(
                "Animation {} is not supported, showing static {}",
                descriptor.kind.as_str(),
                descriptor.start_color
            );
        }
        Self {
            descriptor,
            pattern: descriptor.to_pattern(),
            epoch: now,
        }
    }

    pub const fn descriptor(&self) -> &AnimationDescriptor {
        &self.descriptor
    }

    pub const fn epoch(&self) -> Instant {
        self.epoch
    }

    pub const fn is_static(&self) -> bool {
        self.pattern.is_static()
    }

    /// Compute the color for `now`
    pub fn render(&self, now: Instant, brightness: u8) -> Rgb {
        let elapsed = now.saturating_duration_since(self.epoch);
        self.pattern.color_at(elapsed, brightness)
    }
}
