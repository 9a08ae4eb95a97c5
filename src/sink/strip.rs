//! Addressable strip output
//!
//! Keeps a frame buffer with one entry per slot. Updating a slot rewrites its
//! entry and pushes the whole buffer through the strip driver.

use smart_leds::SmartLedsWrite;

use crate::LightSink;
use crate::color::{OFF, Rgb};
use crate::error::IndicatorError;

/// Addressable-LED output for `N` slots.
pub struct StripSink<W, const N: usize> {
    writer: W,
    frame: [Rgb; N],
}

impl<W, const N: usize> StripSink<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<Rgb>,
{
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            frame: [OFF; N],
        }
    }

    /// Current frame buffer
    pub const fn frame(&self) -> &[Rgb; N] {
        &self.frame
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn push(&mut self) -> Result<(), IndicatorError> {
        self.writer
            .write(self.frame.iter().copied())
            .map_err(|_| IndicatorError::DeviceUnready)
    }
}

impl<W, const N: usize> LightSink for StripSink<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<Rgb>,
{
    fn slot_count(&self) -> usize {
        N
    }

    fn is_ready(&mut self) -> bool {
        N > 0 && self.push().is_ok()
    }

    fn set_slot(&mut self, slot: usize, color: Rgb) -> Result<(), IndicatorError> {
        let Some(entry) = self.frame.get_mut(slot) else {
            return Err(IndicatorError::InvalidIndex);
        };
        *entry = color;
        self.push()
    }
}
