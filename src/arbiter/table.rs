use embassy_time::Instant;
use heapless::Vec;
use log::{debug, info, warn};

use super::Slot;
use crate::animation::{Animation, AnimationDescriptor};
use crate::color::{OFF, PaletteColor, Rgb};
use crate::error::IndicatorError;
use crate::status::{ArbitrationRequest, StatusKind};

/// Slot outputs produced by one render pass
pub type SlotUpdates<const N: usize> = Vec<(usize, Rgb), N>;

/// Ordered list of slot indices
pub type SlotList<const N: usize> = Vec<usize, N>;

/// Fixed arena of `N` slots plus the status routing tables.
#[derive(Debug)]
pub struct SlotTable<const N: usize> {
    slots: [Slot; N],
    mapping: [Option<usize>; StatusKind::COUNT],
    fallbacks: [Option<SlotList<N>>; StatusKind::COUNT],
    brightness: u8,
    sleeping: bool,
    blank_pending: bool,
}

/// Spread the statuses over the available slots in declaration order
const fn default_mapping<const N: usize>() -> [Option<usize>; StatusKind::COUNT] {
    let mut mapping = [None; StatusKind::COUNT];
    if N == 0 {
        return mapping;
    }
    let mut index = 0;
    while index < StatusKind::COUNT {
        mapping[index] = Some(index % N);
        index += 1;
    }
    mapping
}

impl<const N: usize> SlotTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: [Slot::EMPTY; N],
            mapping: default_mapping::<N>(),
            fallbacks: [const { None }; StatusKind::COUNT],
            brightness: u8::MAX,
            sleeping: false,
            blank_pending: false,
        }
    }

    pub const fn slot_count(&self) -> usize {
        N
    }

    pub fn slot(&self, index: usize) -> Result<&Slot, IndicatorError> {
        self.slots.get(index).ok_or(IndicatorError::InvalidIndex)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set output brightness; every slot is re-rendered at the new level
    pub fn set_brightness(&mut self, brightness: u8) {
        if self.brightness == brightness {
            return;
        }
        self.brightness = brightness;
        self.mark_all_dirty();
    }

    pub fn set_slot_mapping(&mut self, kind: StatusKind, slot: usize) -> Result<(), IndicatorError> {
        if slot >= N {
            return Err(IndicatorError::InvalidIndex);
        }
        self.mapping[kind.index()] = Some(slot);
        Ok(())
    }

    /// Remove the dedicated slot of `kind`; it will only use fallbacks
    pub fn clear_slot_mapping(&mut self, kind: StatusKind) {
        self.mapping[kind.index()] = None;
    }

    pub const fn slot_mapping(&self, kind: StatusKind) -> Option<usize> {
        self.mapping[kind.index()]
    }

    /// Replace the fallback order of `kind`. Duplicates are skipped.
    pub fn set_fallbacks(&mut self, kind: StatusKind, order: &[usize]) -> Result<(), IndicatorError> {
        let mut list = SlotList::<N>::new();
        for &slot in order {
            if slot >= N {
                return Err(IndicatorError::InvalidIndex);
            }
            if !list.contains(&slot) {
                list.push(slot).map_err(|_| IndicatorError::InvalidIndex)?;
            }
        }
        self.fallbacks[kind.index()] = Some(list);
        Ok(())
    }

    /// Slots `kind` may use, dedicated slot first
    pub fn candidates(&self, kind: StatusKind) -> SlotList<N> {
        let mut list = SlotList::<N>::new();
        let mapped = self.slot_mapping(kind);
        if let Some(slot) = mapped {
            let _ = list.push(slot);
        }

        if let Some(order) = &self.fallbacks[kind.index()] {
            for &slot in order {
                if !list.contains(&slot) {
                    let _ = list.push(slot);
                }
            }
        } else {
            // Default order: walk the ring starting after the dedicated slot
            let start = mapped.map_or(0, |slot| slot + 1);
            for offset in 0..N {
                let slot = (start + offset) % N;
                if !list.contains(&slot) {
                    let _ = list.push(slot);
                }
            }
        }
        list
    }

    /// Find a slot for `request`, preempting a less urgent holder if needed
    pub fn assign(&mut self, request: &ArbitrationRequest, now: Instant) -> Result<usize, IndicatorError> {
        let candidates = self.candidates(request.kind);
        let Some(index) = candidates
            .iter()
            .copied()
            .find(|&slot| self.slots[slot].accepts(request))
        else {
            warn!(
                "No slot for {} {} at priority {}",
                request.kind.as_str(),
                request.color,
                request.priority.0
            );
            return Err(IndicatorError::Denied);
        };

        let owner = self.slot_mapping(request.kind) == Some(index);
        let slot = &mut self.slots[index];
        if let Some(holder) = slot.holder().filter(|holder| *holder != request.kind) {
            info!(
                "Slot {} preempted: {} replaces {}",
                index,
                request.kind.as_str(),
                holder.as_str()
            );
        }
        slot.take(request, owner, now);
        debug!(
            "Slot {} shows {} for {} (shared: {})",
            index,
            request.color,
            request.kind.as_str(),
            slot.shared
        );
        Ok(index)
    }

    /// Hand back every slot held by `kind`. Returns how many slots changed.
    pub fn release(&mut self, kind: StatusKind) -> usize {
        let mut released = 0;
        for slot in &mut self.slots {
            if slot.status_kind != Some(kind) {
                continue;
            }
            if slot.is_held() {
                slot.hand_back(false);
                released += 1;
            } else {
                slot.status_kind = None;
            }
        }
        if released > 0 {
            debug!("Released {} slot(s) of {}", released, kind.as_str());
        }
        released
    }

    /// Revert shared assignments whose expiry is not in the future
    pub fn sweep(&mut self, now: Instant) -> usize {
        let mut expired = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_expired(now) {
                debug!("Slot {} share expired, restoring {}", index, slot.base_color);
                slot.hand_back(true);
                expired += 1;
            }
        }
        expired
    }

    pub fn set_pattern(
        &mut self,
        index: usize,
        descriptor: AnimationDescriptor,
        now: Instant,
    ) -> Result<(), IndicatorError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(IndicatorError::InvalidIndex)?;
        slot.set_animation(Animation::new(descriptor, now));
        Ok(())
    }

    /// Show a color decided outside of arbitration, e.g. by blink playback
    ///
    /// Ownership is left untouched; the color goes out on the next render.
    pub fn record_output(&mut self, index: usize, color: PaletteColor) -> Result<(), IndicatorError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(IndicatorError::InvalidIndex)?;
        slot.current_color = color;
        slot.dirty = true;
        Ok(())
    }

    pub const fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// While sleeping all output is blanked; waking re-renders every slot
    pub fn set_sleeping(&mut self, sleeping: bool) {
        if self.sleeping == sleeping {
            return;
        }
        self.sleeping = sleeping;
        if sleeping {
            self.blank_pending = true;
        } else {
            self.blank_pending = false;
            self.mark_all_dirty();
        }
    }

    pub fn has_running_animations(&self) -> bool {
        self.slots.iter().any(|slot| slot.animation.is_some())
    }

    /// Earliest pending share expiry
    pub fn next_expiry(&self) -> Option<Instant> {
        self.slots
            .iter()
            .filter(|slot| slot.is_held() && slot.shared)
            .filter_map(|slot| slot.share_expiry)
            .min()
    }

    /// One animation tick plus a flush of changed slots
    ///
    /// Animated slots are recomputed from their epoch every call; static
    /// slots are only emitted when they changed since the last call.
    pub fn render(&mut self, now: Instant) -> SlotUpdates<N> {
        let mut updates = SlotUpdates::<N>::new();
        if self.sleeping {
            if self.blank_pending {
                self.blank_pending = false;
                for index in 0..N {
                    let _ = updates.push((index, OFF));
                }
            }
            return updates;
        }

        let brightness = self.brightness;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Some(animation) = &slot.animation {
                let _ = updates.push((index, animation.render(now, brightness)));
                slot.dirty = false;
            } else if slot.dirty {
                let _ = updates.push((index, slot.current_color.to_rgb(brightness)));
                slot.dirty = false;
            }
        }
        updates
    }

    fn mark_all_dirty(&mut self) {
        for slot in &mut self.slots {
            slot.dirty = true;
        }
    }
}

impl<const N: usize> Default for SlotTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
