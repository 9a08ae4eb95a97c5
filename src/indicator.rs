//! Status event adapters
//!
//! [`StatusIndicator`] is the producer side of the indicator. Device-state
//! collaborators report events to it; it resolves them through the policy
//! tables and either enqueues blink items (queue mode) or sends arbitration
//! requests (shared mode). Bursty events go through a [`Debouncer`] that the
//! owner drives with [`StatusIndicator::poll`].
//!
//! # Usage
//!
//! ```ignore
//! static ARBITER: StatusArbiter<1> = StatusArbiter::new();
//! static QUEUE: BlinkQueue = BlinkQueue::new();
//! static INDICATOR: StatusIndicator<1, 16> =
//!     StatusIndicator::new(&ARBITER, QUEUE.sender(), WidgetConfig::DEFAULT);
//!
//! INDICATOR.start(Instant::now());
//! loop {
//!     let next = INDICATOR.poll(Instant::now());
//!     // sleep until `next`, or until an event arrives
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;
use heapless::Vec;
use log::{debug, info};

use crate::animation::AnimationDescriptor;
use crate::arbiter::StatusArbiter;
use crate::boot::{BootAction, BootSequence};
use crate::color::PaletteColor;
use crate::config::{BatteryScope, IndicatorMode, LayerIndication, WidgetConfig};
use crate::debounce::Debouncer;
use crate::error::IndicatorError;
use crate::policy::{
    self, ConnectivityState, StatusColor, battery_color, connectivity_color, is_critical_battery,
};
use crate::queue::{BlinkItem, QueueSender};
use crate::status::{ArbitrationRequest, Priority, StatusKind};

/// Most split peripherals whose battery level is tracked
pub const MAX_PERIPHERALS: usize = 4;

type BatteryLevels = Vec<u8, { MAX_PERIPHERALS + 1 }>;

/// Which indications a key binding triggers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicateBinding {
    pub battery: bool,
    pub connectivity: bool,
    pub layer: bool,
}

impl IndicateBinding {
    pub const ALL: Self = Self {
        battery: true,
        connectivity: true,
        layer: true,
    };
}

/// Last known device state
#[derive(Debug, Clone, Copy)]
struct DeviceState {
    battery: u8,
    peripherals: [Option<u8>; MAX_PERIPHERALS],
    /// Battery status last shown in shared mode
    battery_status: Option<StatusColor>,
    connectivity: Option<ConnectivityState>,
    /// Last BLE profile state, shown when USB indication is off
    last_profile: Option<ConnectivityState>,
    layer: u8,
    /// Persistent layer color last applied
    layer_color: PaletteColor,
    boot: BootSequence,
}

impl DeviceState {
    const fn new(config: &WidgetConfig) -> Self {
        Self {
            battery: 0,
            peripherals: [None; MAX_PERIPHERALS],
            battery_status: None,
            connectivity: None,
            last_profile: None,
            layer: 0,
            layer_color: PaletteColor::Black,
            boot: BootSequence::new(config),
        }
    }

    fn battery_levels(&self, scope: BatteryScope) -> BatteryLevels {
        let mut levels = BatteryLevels::new();
        if scope != BatteryScope::Peripherals {
            let _ = levels.push(self.battery);
        }
        if scope != BatteryScope::Own {
            for level in self.peripherals.iter().flatten() {
                let _ = levels.push(*level);
            }
        }
        levels
    }
}

/// Producer facade translating device events into light requests.
pub struct StatusIndicator<'a, const N: usize, const Q: usize> {
    arbiter: &'a StatusArbiter<N>,
    queue: QueueSender<'a, Q>,
    config: WidgetConfig,
    state: Mutex<RefCell<DeviceState>>,
    connectivity: Debouncer<ConnectivityState>,
    layer: Debouncer<u8>,
}

impl<'a, const N: usize, const Q: usize> StatusIndicator<'a, N, Q> {
    pub const fn new(
        arbiter: &'a StatusArbiter<N>,
        queue: QueueSender<'a, Q>,
        config: WidgetConfig,
    ) -> Self {
        Self {
            arbiter,
            queue,
            state: Mutex::new(RefCell::new(DeviceState::new(&config))),
            connectivity: Debouncer::new(config.timings.connectivity_debounce),
            layer: Debouncer::new(config.timings.layer_debounce),
            config,
        }
    }

    pub const fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut DeviceState) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow(cs).borrow_mut()))
    }

    fn is_shared(&self) -> bool {
        self.config.mode == IndicatorMode::Shared
    }

    /// Apply the configured brightness and begin the startup sequence
    pub fn start(&self, now: Instant) {
        self.arbiter.set_brightness(self.config.brightness);
        self.with_state(|state| state.boot.start(now));
    }

    /// Whether startup finished and live events are indicated
    pub fn is_initialized(&self) -> bool {
        self.with_state(|state| state.boot.is_done())
    }

    /// Run due startup steps and debounced actions
    ///
    /// Returns when the indicator wants to be polled again, `None` if nothing
    /// is pending.
    pub fn poll(&self, now: Instant) -> Option<Instant> {
        let action = self.with_state(|state| {
            let level = state.battery;
            state.boot.poll(now, level)
        });
        match action {
            Some(BootAction::IndicateBattery) => {
                let _ = self.battery_indication(now, true);
            }
            Some(BootAction::Complete) => self.complete_boot(now),
            None => {}
        }

        if let Some(state) = self.connectivity.poll(now) {
            let _ = self.show_connectivity(state, now);
        }
        if let Some(layer) = self.layer.poll(now) {
            let _ = self.blink_layer(layer);
        }

        [
            self.with_state(|state| state.boot.next_deadline()),
            self.connectivity.deadline(),
            self.layer.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn complete_boot(&self, now: Instant) {
        info!("Indicating initial connectivity status");
        self.indicate_connectivity(now);
        if self.shows_layer_color() {
            info!("Setting initial layer color");
            let _ = self.update_layer_color(now);
        }
        info!("Finished initializing status indicator");
    }

    // Status events

    /// Battery state of charge of this device changed
    ///
    /// Queue mode only blinks a critical level. In shared mode the battery
    /// slot follows the most depleted device in scope.
    pub fn on_battery_level(&self, level: u8, now: Instant) {
        let initialized = self.with_state(|state| {
            state.battery = level;
            state.boot.is_done()
        });
        if !initialized || !self.config.battery.enabled {
            return;
        }

        if self.is_shared() {
            let _ = self.refresh_battery(now);
        } else if is_critical_battery(level, &self.config.battery) {
            let status = battery_color(level, &self.config.battery);
            let _ = self.enqueue(BlinkItem::blink(
                status.color,
                self.config.timings.battery_blink,
            ));
        }
    }

    /// Battery level reported by split peripheral `index`
    pub fn on_peripheral_battery_level(
        &self,
        index: usize,
        level: u8,
        now: Instant,
    ) -> Result<(), IndicatorError> {
        let initialized = self.with_state(|state| {
            let entry = state
                .peripherals
                .get_mut(index)
                .ok_or(IndicatorError::InvalidIndex)?;
            *entry = Some(level);
            Ok::<_, IndicatorError>(state.boot.is_done())
        })?;

        let battery = &self.config.battery;
        if !initialized || !battery.enabled || battery.scope == BatteryScope::Own {
            return Ok(());
        }
        if self.is_shared() {
            self.refresh_battery(now)?;
        } else if is_critical_battery(level, battery) {
            info!("Peripheral {} battery critical", index);
            let status = battery_color(level, battery);
            self.enqueue(BlinkItem::blink(status.color, self.config.timings.battery_blink))?;
        }
        Ok(())
    }

    /// Selected transport or link state changed
    pub fn on_connectivity_state(&self, connectivity: ConnectivityState, now: Instant) {
        let initialized = self.with_state(|state| {
            state.connectivity = Some(connectivity);
            if matches!(connectivity, ConnectivityState::Profile { .. }) {
                state.last_profile = Some(connectivity);
            }
            state.boot.is_done()
        });
        if initialized {
            self.connectivity.schedule(connectivity, now);
        }
    }

    /// Highest active layer changed
    pub fn on_active_layer(&self, layer: u8, now: Instant) {
        let initialized = self.with_state(|state| {
            state.layer = layer;
            state.boot.is_done()
        });
        if !initialized {
            return;
        }

        if self.shows_layer_color() {
            let _ = self.update_layer_color(now);
        } else if self.config.layer.indication == LayerIndication::BlinkCount {
            self.layer.schedule(layer, now);
        }
    }

    /// The device went to sleep: turn every light off
    pub fn on_idle_sleep(&self) {
        info!("Detected sleep activity state, turn off LED");
        self.arbiter.set_sleeping(true);
    }

    /// Activity resumed after sleep: restore the last output
    pub fn on_activity_resumed(&self) {
        if self.arbiter.is_sleeping() {
            info!("Activity resumed, restoring LED");
        }
        self.arbiter.set_sleeping(false);
    }

    // Manual indication

    /// Show the battery level of every device in the configured scope
    pub fn indicate_battery(&self, now: Instant) -> Result<(), IndicatorError> {
        self.battery_indication(now, false)
    }

    fn battery_indication(&self, now: Instant, boot: bool) -> Result<(), IndicatorError> {
        let battery = &self.config.battery;
        if !battery.enabled {
            return Ok(());
        }
        if self.is_shared() {
            let Some(level) = self.most_depleted() else {
                return Ok(());
            };
            self.show_battery(battery_color(level, battery), now).map(|_| ())
        } else {
            let levels = self.with_state(|state| state.battery_levels(battery.scope));
            for level in levels {
                let status = battery_color(level, battery);
                let mut item = BlinkItem::blink(status.color, self.config.timings.battery_blink);
                if boot {
                    item = item.first();
                }
                self.enqueue(item)?;
            }
            Ok(())
        }
    }

    /// Schedule a connectivity indication for the last known state
    ///
    /// Returns `false` if no connectivity state was reported yet.
    pub fn indicate_connectivity(&self, now: Instant) -> bool {
        match self.with_state(|state| state.connectivity) {
            Some(connectivity) => {
                self.connectivity.schedule(connectivity, now);
                true
            }
            None => {
                debug!("No connectivity state yet, nothing to indicate");
                false
            }
        }
    }

    /// Show the active layer
    ///
    /// Blinks the layer color once per layer index in queue mode; in shared
    /// mode the persistent layer color is asserted again.
    pub fn indicate_layer(&self, now: Instant) -> Result<(), IndicatorError> {
        let layer = self.with_state(|state| state.layer);
        if self.is_shared() {
            let status = policy::layer_color(layer, &self.config.layer);
            self.with_state(|state| state.layer_color = status.color);
            return self.apply_layer_color(status, now);
        }
        self.blink_layer(layer)
    }

    /// Apply the color of the active layer if it changed
    pub fn update_layer_color(&self, now: Instant) -> Result<(), IndicatorError> {
        let status = self.with_state(|state| {
            let status = policy::layer_color(state.layer, &self.config.layer);
            if state.layer_color == status.color {
                None
            } else {
                info!(
                    "Setting layer color to {} for layer {}",
                    status.color, state.layer
                );
                state.layer_color = status.color;
                Some(status)
            }
        });
        match status {
            Some(status) => self.apply_layer_color(status, now),
            None => Ok(()),
        }
    }

    /// Run the indications selected by a key binding
    ///
    /// Every selected indication runs; the first error is returned.
    pub fn trigger(&self, binding: IndicateBinding, now: Instant) -> Result<(), IndicatorError> {
        let mut result = Ok(());
        if binding.battery {
            result = result.and(self.indicate_battery(now));
        }
        if binding.connectivity {
            self.indicate_connectivity(now);
        }
        if binding.layer {
            result = result.and(self.indicate_layer(now));
        }
        result
    }

    // Custom statuses

    /// Show an application-defined status through arbitration
    pub fn show_custom(
        &self,
        color: PaletteColor,
        animation: Option<AnimationDescriptor>,
        now: Instant,
    ) -> Result<usize, IndicatorError> {
        let mut request = ArbitrationRequest::new(StatusKind::Custom, color, Priority::CUSTOM);
        if let Some(animation) = animation {
            request = request.with_animation(animation);
        }
        self.arbiter.assign(&request, now)
    }

    pub fn clear_custom(&self) -> usize {
        self.arbiter.release(StatusKind::Custom)
    }

    // Configuration surface

    pub fn set_brightness(&self, brightness: u8) {
        self.arbiter.set_brightness(brightness);
    }

    pub fn brightness(&self) -> u8 {
        self.arbiter.brightness()
    }

    pub const fn slot_count(&self) -> usize {
        N
    }

    pub fn set_slot_mapping(&self, kind: StatusKind, slot: usize) -> Result<(), IndicatorError> {
        self.arbiter.set_slot_mapping(kind, slot)
    }

    pub fn slot_mapping(&self, kind: StatusKind) -> Option<usize> {
        self.arbiter.slot_mapping(kind)
    }

    // Cached state

    pub fn battery_level(&self) -> u8 {
        self.with_state(|state| state.battery)
    }

    pub fn peripheral_battery_level(&self, index: usize) -> Option<u8> {
        self.with_state(|state| state.peripherals.get(index).copied().flatten())
    }

    pub fn connectivity(&self) -> Option<ConnectivityState> {
        self.with_state(|state| state.connectivity)
    }

    pub fn active_layer(&self) -> u8 {
        self.with_state(|state| state.layer)
    }

    pub fn layer_color(&self) -> PaletteColor {
        self.with_state(|state| state.layer_color)
    }

    // Internals

    fn shows_layer_color(&self) -> bool {
        match self.config.layer.indication {
            LayerIndication::Off => false,
            LayerIndication::Colors => true,
            LayerIndication::BlinkCount => self.is_shared(),
        }
    }

    fn enqueue(&self, item: BlinkItem) -> Result<(), IndicatorError> {
        self.queue.try_enqueue(item)
    }

    /// Lowest level in the battery scope; one battery slot shows the most depleted device
    fn most_depleted(&self) -> Option<u8> {
        let scope = self.config.battery.scope;
        self.with_state(|state| state.battery_levels(scope))
            .iter()
            .copied()
            .min()
    }

    /// Re-request the battery slot when the most depleted band changed
    fn refresh_battery(&self, now: Instant) -> Result<(), IndicatorError> {
        let Some(level) = self.most_depleted() else {
            return Ok(());
        };
        let status = battery_color(level, &self.config.battery);
        if self.with_state(|state| state.battery_status) == Some(status) {
            return Ok(());
        }
        self.show_battery(status, now).map(|_| ())
    }

    fn show_battery(&self, status: StatusColor, now: Instant) -> Result<usize, IndicatorError> {
        self.with_state(|state| state.battery_status = Some(status));
        let mut request = ArbitrationRequest::new(StatusKind::Battery, status.color, status.priority);
        request = if status.is_critical() {
            request.with_animation(AnimationDescriptor::blink(
                status.color,
                PaletteColor::Black,
                self.config.timings.battery_blink,
            ))
        } else {
            request.with_timeout(self.config.timings.battery_blink)
        };
        self.arbiter.assign(&request, now)
    }

    fn show_connectivity(
        &self,
        connectivity: ConnectivityState,
        now: Instant,
    ) -> Result<(), IndicatorError> {
        let last_profile = self.with_state(|state| state.last_profile);
        let Some(status) = connectivity_color(connectivity, last_profile, &self.config.connectivity)
        else {
            return Ok(());
        };
        let blink = self.config.timings.connectivity_blink;

        if self.is_shared() {
            let mut request =
                ArbitrationRequest::new(StatusKind::Connectivity, status.color, status.priority)
                    .with_timeout(blink);
            if policy::is_advertising(connectivity) {
                request = request.with_animation(AnimationDescriptor::blink(
                    status.color,
                    PaletteColor::Black,
                    blink,
                ));
            }
            self.arbiter.assign(&request, now).map(|_| ())
        } else {
            self.enqueue(BlinkItem::blink(status.color, blink))
        }
    }

    fn blink_layer(&self, layer: u8) -> Result<(), IndicatorError> {
        info!(
            "Blinking {} times {} for layer change",
            layer, self.config.layer.blink_color
        );
        for item in policy::layer_blinks(layer, &self.config) {
            self.enqueue(item)?;
        }
        Ok(())
    }

    fn apply_layer_color(&self, status: StatusColor, now: Instant) -> Result<(), IndicatorError> {
        if !self.is_shared() {
            return self.enqueue(BlinkItem::ambient(status.color));
        }
        if status.color.is_black() {
            self.arbiter.release(StatusKind::Layer);
            return Ok(());
        }
        let request = ArbitrationRequest::new(StatusKind::Layer, status.color, status.priority);
        self.arbiter.assign(&request, now).map(|_| ())
    }
}
