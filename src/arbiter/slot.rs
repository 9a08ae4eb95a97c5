use embassy_time::Instant;

use crate::animation::Animation;
use crate::color::PaletteColor;
use crate::status::{ArbitrationRequest, Priority, StatusKind};

/// State of one physical light position.
///
/// Only the slot table mutates slots; they are reset, never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub(crate) current_color: PaletteColor,
    pub(crate) base_color: PaletteColor,
    pub(crate) status_kind: Option<StatusKind>,
    pub(crate) priority: Priority,
    pub(crate) shared: bool,
    pub(crate) persistent: bool,
    pub(crate) share_expiry: Option<Instant>,
    pub(crate) animation: Option<Animation>,
    /// Output differs from what the sink last received
    pub(crate) dirty: bool,
}

impl Slot {
    pub const EMPTY: Slot = Slot {
        current_color: PaletteColor::Black,
        base_color: PaletteColor::Black,
        status_kind: None,
        priority: Priority::AMBIENT,
        shared: false,
        persistent: false,
        share_expiry: None,
        animation: None,
        dirty: false,
    };

    pub const fn current_color(&self) -> PaletteColor {
        self.current_color
    }

    /// Color restored when a temporary share ends
    pub const fn base_color(&self) -> PaletteColor {
        self.base_color
    }

    /// Last status assigned here; stays set after an expiry until reassigned
    pub const fn status_kind(&self) -> Option<StatusKind> {
        self.status_kind
    }

    pub const fn priority(&self) -> Priority {
        self.priority
    }

    pub const fn is_shared(&self) -> bool {
        self.shared
    }

    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub const fn share_expiry(&self) -> Option<Instant> {
        self.share_expiry
    }

    pub const fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Whether a status currently holds the slot
    pub const fn is_held(&self) -> bool {
        self.status_kind.is_some() && self.priority.0 != Priority::AMBIENT.0
    }

    pub(crate) fn holder(&self) -> Option<StatusKind> {
        self.status_kind.filter(|_| self.is_held())
    }

    /// Whether `request` may take this slot right now
    pub(crate) fn accepts(&self, request: &ArbitrationRequest) -> bool {
        let Some(holder) = self.holder() else {
            return true;
        };
        if holder == request.kind {
            return true;
        }
        if self.priority.is_critical() {
            return false;
        }
        request.priority.is_more_urgent_than(self.priority)
            || (request.priority == self.priority && self.shared)
    }

    /// Hand the slot to `request`. `owner` tells whether the requesting
    /// status is the slot's permanent owner.
    pub(crate) fn take(&mut self, request: &ArbitrationRequest, owner: bool, now: Instant) {
        match self.holder() {
            Some(holder) if holder == request.kind => {}
            Some(_) => {
                if !self.shared {
                    self.base_color = self.current_color;
                    self.shared = true;
                }
            }
            None => {
                self.shared = !owner;
                self.base_color = if self.shared {
                    self.current_color
                } else {
                    PaletteColor::Black
                };
            }
        }

        self.status_kind = Some(request.kind);
        self.priority = request.priority;
        self.persistent = request.persistent;
        self.share_expiry = if request.expires() {
            Some(now + request.timeout)
        } else {
            None
        };
        self.current_color = request.color;
        self.animation = None;
        if let Some(descriptor) = request.animation {
            self.set_animation(Animation::new(descriptor, now));
        }
        self.dirty = true;
    }

    pub(crate) fn set_animation(&mut self, animation: Animation) {
        if animation.is_static() {
            self.current_color = animation.descriptor().start_color;
            self.animation = None;
        } else {
            self.animation = Some(animation);
        }
        self.dirty = true;
    }

    /// Restore the base color of a shared slot or blank a dedicated one
    pub(crate) fn hand_back(&mut self, keep_status: bool) {
        self.current_color = if self.shared {
            self.base_color
        } else {
            PaletteColor::Black
        };
        self.base_color = PaletteColor::Black;
        if !keep_status {
            self.status_kind = None;
        }
        self.priority = Priority::AMBIENT;
        self.shared = false;
        self.persistent = false;
        self.share_expiry = None;
        self.animation = None;
        self.dirty = true;
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        self.is_held()
            && self.shared
            && self.share_expiry.is_some_and(|expiry| expiry <= now)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::EMPTY
    }
}
