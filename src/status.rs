//! Status sources, priorities and arbitration requests

use embassy_time::Duration;

use crate::animation::AnimationDescriptor;
use crate::color::PaletteColor;

/// Logical status that can own a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusKind {
    Battery = 0,
    Connectivity = 1,
    Layer = 2,
    Custom = 3,
}

impl StatusKind {
    pub const COUNT: usize = 4;

    pub const ALL: [StatusKind; Self::COUNT] =
        [Self::Battery, Self::Connectivity, Self::Layer, Self::Custom];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Connectivity => "connectivity",
            Self::Layer => "layer",
            Self::Custom => "custom",
        }
    }
}

/// Arbitration priority, lower is more urgent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u8);

impl Priority {
    /// Unique highest urgency, never preemptible by another status
    pub const CRITICAL_BATTERY: Priority = Priority(0);
    pub const CONNECTIVITY: Priority = Priority(10);
    pub const BATTERY: Priority = Priority(20);
    pub const LAYER: Priority = Priority(30);
    pub const CUSTOM: Priority = Priority(40);
    /// Priority of a slot nobody holds
    pub const AMBIENT: Priority = Priority(u8::MAX);

    pub const fn is_critical(self) -> bool {
        self.0 == Self::CRITICAL_BATTERY.0
    }

    pub const fn is_more_urgent_than(self, other: Priority) -> bool {
        self.0 < other.0
    }
}

/// A status asking to be shown. Consumed immediately by the arbiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArbitrationRequest {
    pub kind: StatusKind,
    pub color: PaletteColor,
    pub priority: Priority,
    /// Survive until explicitly released
    pub persistent: bool,
    /// Hand-back delay for a shared assignment, zero means no expiry
    pub timeout: Duration,
    pub animation: Option<AnimationDescriptor>,
}

impl ArbitrationRequest {
    pub const fn new(kind: StatusKind, color: PaletteColor, priority: Priority) -> Self {
        Self {
            kind,
            color,
            priority,
            persistent: true,
            timeout: Duration::from_millis(0),
            animation: None,
        }
    }

    /// Mark the request as temporary, expiring `timeout` after assignment when shared
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.persistent = false;
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn persistent(mut self) -> Self {
        self.persistent = true;
        self.timeout = Duration::from_millis(0);
        self
    }

    #[must_use]
    pub const fn with_animation(mut self, animation: AnimationDescriptor) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Whether an assignment from this request ever expires
    pub const fn expires(&self) -> bool {
        !self.persistent && self.timeout.as_millis() > 0
    }
}
