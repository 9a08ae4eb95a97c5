//! Error taxonomy
//!
//! None of these are fatal to the host device. Every failure degrades to
//! "no visual indication" and is reported through the `log` facade.

/// Errors surfaced by the indicator subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorError {
    /// No slot was eligible for an arbitration request.
    Denied,
    /// The blink queue was full and the item was dropped.
    QueueFull,
    /// The physical sink is not ready (or a bus write failed).
    DeviceUnready,
    /// A slot index at or beyond the configured slot count.
    InvalidIndex,
}

impl core::fmt::Display for IndicatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IndicatorError::Denied => write!(f, "no slot available for request"),
            IndicatorError::QueueFull => write!(f, "blink queue is full"),
            IndicatorError::DeviceUnready => write!(f, "light device is not ready"),
            IndicatorError::InvalidIndex => write!(f, "slot index out of range"),
        }
    }
}

impl core::error::Error for IndicatorError {}
