#![no_std]

pub mod animation;
pub mod arbiter;
pub mod boot;
pub mod color;
pub mod config;
pub mod debounce;
pub mod error;
pub mod indicator;
pub mod math8;
pub mod playback;
pub mod policy;
pub mod queue;
pub mod sink;
pub mod status;
pub mod worker;

pub use animation::{AnimationDescriptor, AnimationKind};
pub use arbiter::{Slot, StatusArbiter};
pub use config::{IndicatorMode, LayerIndication, WidgetConfig};
pub use error::IndicatorError;
pub use indicator::{IndicateBinding, StatusIndicator};
pub use policy::{ConnectivityState, LinkStatus};
pub use queue::{BlinkItem, BlinkQueue};
pub use sink::{StripSink, TriColorSink};
pub use status::{ArbitrationRequest, Priority, StatusKind};
pub use worker::{RenderWorker, TickResult};

pub use color::{PaletteColor, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract light output
///
/// Implement this trait to support different hardware. The render worker is
/// generic over it and is the only caller.
pub trait LightSink {
    /// Number of independently addressable slots
    fn slot_count(&self) -> usize;

    /// Whether the device can be driven. Checked once by the worker.
    fn is_ready(&mut self) -> bool {
        true
    }

    /// Show `color` on one slot
    fn set_slot(&mut self, slot: usize, color: Rgb) -> Result<(), IndicatorError>;
}
