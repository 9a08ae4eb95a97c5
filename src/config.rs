//! Indicator configuration
//!
//! Everything the build system would otherwise decide (timings, thresholds,
//! palette choices, which indications are enabled) is injected through
//! [`WidgetConfig`] at startup.

use embassy_time::Duration;

use crate::color::PaletteColor;
use crate::worker::{DEFAULT_FRAME_DURATION, DEFAULT_POLL_CEILING};

/// Number of entries in the per-layer color table
pub const LAYER_COLOR_COUNT: usize = 32;

/// Fixed debounce for connectivity changes
pub const CONNECTIVITY_DEBOUNCE: Duration = Duration::from_millis(16);

/// Timing of indications
#[derive(Debug, Clone, Copy)]
pub struct IndicatorTimings {
    /// Gap between blinks and default ambient hold
    pub interval: Duration,
    /// Duration of a battery blink
    pub battery_blink: Duration,
    /// Duration of a connectivity blink
    pub connectivity_blink: Duration,
    /// Duration of a layer blink
    pub layer_blink: Duration,
    /// Quiet period before a layer change is indicated
    pub layer_debounce: Duration,
    /// Quiet period before a connectivity change is indicated
    pub connectivity_debounce: Duration,
    /// Longest sleep between worker ticks
    pub poll_ceiling: Duration,
    /// Frame duration while animations run
    pub frame: Duration,
}

impl IndicatorTimings {
    pub const DEFAULT: Self = Self {
        interval: Duration::from_millis(500),
        battery_blink: Duration::from_millis(2000),
        connectivity_blink: Duration::from_millis(1000),
        layer_blink: Duration::from_millis(250),
        layer_debounce: Duration::from_millis(100),
        connectivity_debounce: CONNECTIVITY_DEBOUNCE,
        poll_ceiling: DEFAULT_POLL_CEILING,
        frame: DEFAULT_FRAME_DURATION,
    };
}

/// Battery level thresholds in percent
#[derive(Debug, Clone, Copy)]
pub struct BatteryThresholds {
    pub high: u8,
    pub low: u8,
    pub critical: u8,
}

/// Colors for battery states
#[derive(Debug, Clone, Copy)]
pub struct BatteryColors {
    pub high: PaletteColor,
    pub medium: PaletteColor,
    pub low: PaletteColor,
    pub critical: PaletteColor,
    /// Level unknown (reported as zero)
    pub missing: PaletteColor,
}

/// Whose battery an indication reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryScope {
    /// Only this device
    Own,
    /// This device followed by every split peripheral
    OwnAndPeripherals,
    /// Only the split peripherals
    Peripherals,
}

#[derive(Debug, Clone, Copy)]
pub struct BatteryConfig {
    /// Battery reporting available at all
    pub enabled: bool,
    pub thresholds: BatteryThresholds,
    pub colors: BatteryColors,
    pub scope: BatteryScope,
    /// Boot-time reads while the gauge still reports zero
    pub boot_retries: u8,
    pub boot_retry_interval: Duration,
}

impl BatteryConfig {
    pub const DEFAULT: Self = Self {
        enabled: true,
        thresholds: BatteryThresholds {
            high: 80,
            low: 20,
            critical: 5,
        },
        colors: BatteryColors {
            high: PaletteColor::Green,
            medium: PaletteColor::Yellow,
            low: PaletteColor::Red,
            critical: PaletteColor::Red,
            missing: PaletteColor::Magenta,
        },
        scope: BatteryScope::Own,
        boot_retries: 10,
        boot_retry_interval: Duration::from_millis(100),
    };
}

/// Colors for connectivity states
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityConfig {
    pub connected: PaletteColor,
    /// Profile open and advertising
    pub advertising: PaletteColor,
    pub disconnected: PaletteColor,
    pub usb: PaletteColor,
    /// Indicate the USB transport; otherwise the BLE profile state is shown
    pub show_usb: bool,
}

impl ConnectivityConfig {
    pub const DEFAULT: Self = Self {
        connected: PaletteColor::Blue,
        advertising: PaletteColor::Yellow,
        disconnected: PaletteColor::Red,
        usb: PaletteColor::White,
        show_usb: true,
    };
}

/// How layer changes are shown. The modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerIndication {
    Off,
    /// Blink the layer color once per layer index
    BlinkCount,
    /// Show the per-layer color as the persistent ambient color
    Colors,
}

#[derive(Debug, Clone, Copy)]
pub struct LayerConfig {
    pub indication: LayerIndication,
    /// Color blinked in [`LayerIndication::BlinkCount`] mode
    pub blink_color: PaletteColor,
    pub colors: [PaletteColor; LAYER_COLOR_COUNT],
}

impl LayerConfig {
    pub const DEFAULT: Self = Self {
        indication: LayerIndication::BlinkCount,
        blink_color: PaletteColor::Cyan,
        colors: [PaletteColor::Black; LAYER_COLOR_COUNT],
    };

    /// Color of `layer`, black past the end of the table
    pub fn color_for(&self, layer: u8) -> PaletteColor {
        self.colors
            .get(usize::from(layer))
            .copied()
            .unwrap_or(PaletteColor::Black)
    }
}

/// Which engine renders status events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorMode {
    /// One indicator multiplexing blinks and the ambient color via the blink queue
    Queue,
    /// Statuses compete for slots through the arbiter
    Shared,
}

/// Configuration for the status indicator
#[derive(Debug, Clone, Copy)]
pub struct WidgetConfig {
    pub mode: IndicatorMode,
    /// Slot driven by blink playback
    pub queue_slot: usize,
    pub brightness: u8,
    pub timings: IndicatorTimings,
    pub battery: BatteryConfig,
    pub connectivity: ConnectivityConfig,
    pub layer: LayerConfig,
}

impl WidgetConfig {
    pub const DEFAULT: Self = Self {
        mode: IndicatorMode::Queue,
        queue_slot: 0,
        brightness: u8::MAX,
        timings: IndicatorTimings::DEFAULT,
        battery: BatteryConfig::DEFAULT,
        connectivity: ConnectivityConfig::DEFAULT,
        layer: LayerConfig::DEFAULT,
    };
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
