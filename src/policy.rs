//! Fixed policy tables turning device state into colors and priorities

use log::info;

use crate::color::PaletteColor;
use crate::config::{BatteryConfig, ConnectivityConfig, LayerConfig, WidgetConfig};
use crate::queue::BlinkItem;
use crate::status::Priority;

/// Resolved color and urgency for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusColor {
    pub color: PaletteColor,
    pub priority: Priority,
}

impl StatusColor {
    pub const fn is_critical(&self) -> bool {
        self.priority.is_critical()
    }
}

/// Whether `level` is a known level at or below the critical threshold
pub const fn is_critical_battery(level: u8, config: &BatteryConfig) -> bool {
    level > 0 && level <= config.thresholds.critical
}

/// Color for a battery level in percent
///
/// Zero means the gauge has no reading yet. The critical threshold wins over
/// every other band.
pub fn battery_color(level: u8, config: &BatteryConfig) -> StatusColor {
    let colors = &config.colors;
    let thresholds = &config.thresholds;

    let (color, priority, band) = if level == 0 {
        (colors.missing, Priority::BATTERY, "undetermined")
    } else if is_critical_battery(level, config) {
        (colors.critical, Priority::CRITICAL_BATTERY, "critical")
    } else if level >= thresholds.high {
        (colors.high, Priority::BATTERY, "high")
    } else if level >= thresholds.low {
        (colors.medium, Priority::BATTERY, "medium")
    } else {
        (colors.low, Priority::BATTERY, "low")
    };

    info!("Battery level {} ({}), showing {}", level, band, color);
    StatusColor { color, priority }
}

/// State of a BLE profile link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Connected,
    /// Not bonded to a host yet, advertising
    Open,
    Disconnected,
}

/// Connectivity as reported by the transport collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    /// USB is the selected transport
    Usb,
    /// BLE profile `index` is selected
    Profile { index: u8, link: LinkStatus },
    /// Split peripheral link to the central half
    Peripheral { connected: bool },
}

/// Color for a connectivity state
///
/// With USB indication disabled, a USB state falls back to the last known
/// BLE profile state; `None` if there is nothing to show.
pub fn connectivity_color(
    state: ConnectivityState,
    last_profile: Option<ConnectivityState>,
    config: &ConnectivityConfig,
) -> Option<StatusColor> {
    let color = match state {
        ConnectivityState::Usb if config.show_usb => {
            info!("USB connected, showing {}", config.usb);
            config.usb
        }
        ConnectivityState::Usb => {
            let profile = last_profile.filter(|state| *state != ConnectivityState::Usb)?;
            return connectivity_color(profile, None, config);
        }
        ConnectivityState::Profile { index, link } => {
            let (color, label) = match link {
                LinkStatus::Connected => (config.connected, "connected"),
                LinkStatus::Open => (config.advertising, "open"),
                LinkStatus::Disconnected => (config.disconnected, "not connected"),
            };
            info!("Profile {} {}, showing {}", index, label, color);
            color
        }
        ConnectivityState::Peripheral { connected } => {
            let (color, label) = if connected {
                (config.connected, "connected")
            } else {
                (config.disconnected, "not connected")
            };
            info!("Peripheral {}, showing {}", label, color);
            color
        }
    };

    Some(StatusColor {
        color,
        priority: Priority::CONNECTIVITY,
    })
}

/// Whether the state shows a link still looking for a host
pub const fn is_advertising(state: ConnectivityState) -> bool {
    matches!(
        state,
        ConnectivityState::Profile {
            link: LinkStatus::Open,
            ..
        }
    )
}

/// Persistent color for the active layer
pub fn layer_color(layer: u8, config: &LayerConfig) -> StatusColor {
    StatusColor {
        color: config.color_for(layer),
        priority: Priority::LAYER,
    }
}

/// Blink items signalling `layer` by count
///
/// One blink per layer index, separated by the layer blink duration. The
/// last blink keeps the default interval so the next indication stays apart.
pub fn layer_blinks(layer: u8, config: &WidgetConfig) -> impl Iterator<Item = BlinkItem> {
    let blink = BlinkItem::blink(config.layer.blink_color, config.timings.layer_blink);
    let separator = config.timings.layer_blink;
    (0..layer).map(move |i| {
        if i + 1 < layer {
            blink.with_sleep(separator)
        } else {
            blink
        }
    })
}
