//! Single tri-color indicator on three GPIO pins
//!
//! The indicator has one slot. Each pin is a color bit; only pins whose bit
//! changes are driven, so re-setting the same color touches no pin.

use embedded_hal::digital::OutputPin;

use crate::LightSink;
use crate::color::{Rgb, threshold_mask};
use crate::error::IndicatorError;

const RED_BIT: u8 = 0b001;
const GREEN_BIT: u8 = 0b010;
const BLUE_BIT: u8 = 0b100;

/// Tri-color output backed by `embedded-hal` output pins.
pub struct TriColorSink<R, G, B> {
    red: R,
    green: G,
    blue: B,
    /// Mask currently driven on the pins
    mask: u8,
    initialized: bool,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> TriColorSink<R, G, B> {
    /// Create a sink from the red, green and blue pins.
    ///
    /// Pins are switched off on the first readiness check.
    pub const fn new(red: R, green: G, blue: B) -> Self {
        Self {
            red,
            green,
            blue,
            mask: 0,
            initialized: false,
        }
    }

    /// Mask currently shown (bit 0/1/2 = red/green/blue)
    pub const fn mask(&self) -> u8 {
        self.mask
    }

    /// Release the pins
    pub fn into_pins(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }

    fn apply(&mut self, target: u8, force: bool) -> Result<(), IndicatorError> {
        let changed = if force { 0b111 } else { self.mask ^ target };
        if changed & RED_BIT != 0 {
            drive(&mut self.red, target & RED_BIT != 0)?;
        }
        if changed & GREEN_BIT != 0 {
            drive(&mut self.green, target & GREEN_BIT != 0)?;
        }
        if changed & BLUE_BIT != 0 {
            drive(&mut self.blue, target & BLUE_BIT != 0)?;
        }
        self.mask = target;
        Ok(())
    }
}

fn drive(pin: &mut impl OutputPin, on: bool) -> Result<(), IndicatorError> {
    let result = if on { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| IndicatorError::DeviceUnready)
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> LightSink for TriColorSink<R, G, B> {
    fn slot_count(&self) -> usize {
        1
    }

    fn is_ready(&mut self) -> bool {
        if !self.initialized {
            self.initialized = self.apply(0, true).is_ok();
        }
        self.initialized
    }

    fn set_slot(&mut self, slot: usize, color: Rgb) -> Result<(), IndicatorError> {
        if slot != 0 {
            return Err(IndicatorError::InvalidIndex);
        }
        self.apply(threshold_mask(color), false)
    }
}
