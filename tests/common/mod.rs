//! Shared test infrastructure for the status indicator integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embassy_time::{Duration, Instant};
use embedded_hal::digital::{ErrorType, OutputPin};
use myrtio_status_indicator::{IndicatorError, LightSink, Rgb};
use smart_leds::{RGB8, SmartLedsWrite};

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

// ============================================================================
// Recording sink
// ============================================================================

/// Sink that records every slot write
pub struct RecordingSink<const N: usize> {
    pub ready: bool,
    pub frame: [Rgb; N],
    pub writes: Vec<(usize, Rgb)>,
}

impl<const N: usize> RecordingSink<N> {
    pub fn new() -> Self {
        Self {
            ready: true,
            frame: [Rgb::default(); N],
            writes: Vec::new(),
        }
    }

    pub fn unready() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    pub fn last(&self, slot: usize) -> Rgb {
        self.frame[slot]
    }

    pub fn writes_to(&self, slot: usize) -> Vec<Rgb> {
        self.writes
            .iter()
            .filter(|(index, _)| *index == slot)
            .map(|(_, color)| *color)
            .collect()
    }
}

impl<const N: usize> LightSink for RecordingSink<N> {
    fn slot_count(&self) -> usize {
        N
    }

    fn is_ready(&mut self) -> bool {
        self.ready
    }

    fn set_slot(&mut self, slot: usize, color: Rgb) -> Result<(), IndicatorError> {
        let entry = self.frame.get_mut(slot).ok_or(IndicatorError::InvalidIndex)?;
        *entry = color;
        self.writes.push((slot, color));
        Ok(())
    }
}

// ============================================================================
// Mock GPIO pin
// ============================================================================

#[derive(Debug, Default)]
pub struct PinState {
    pub high: bool,
    pub transitions: u32,
}

/// Output pin sharing its state with the test
#[derive(Clone)]
pub struct MockPin {
    pub state: Rc<RefCell<PinState>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(PinState::default())),
        }
    }

    pub fn is_high(&self) -> bool {
        self.state.borrow().high
    }

    pub fn transitions(&self) -> u32 {
        self.state.borrow().transitions
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.high = false;
        state.transitions += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.high = true;
        state.transitions += 1;
        Ok(())
    }
}

// ============================================================================
// Mock addressable strip
// ============================================================================

/// Strip driver keeping the last pushed frame
#[derive(Default)]
pub struct MockStrip {
    pub frame: Vec<RGB8>,
    pub pushes: u32,
    pub fail: bool,
}

impl SmartLedsWrite for MockStrip {
    type Error = ();
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        if self.fail {
            return Err(());
        }
        self.frame = iterator.into_iter().map(Into::into).collect();
        self.pushes += 1;
        Ok(())
    }
}
