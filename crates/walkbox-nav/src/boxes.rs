//! Region store: per-room walkbox geometry, flags and scale parameters.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scale::{BoxScale, ScaleSlot, FULL_SCALE, MAX_SCALE_SLOTS};
use crate::{BoxCoords, LoadError, NavError, Point};

/// Room-local walkbox identifier.
///
/// Ids are dense indices into the room's box table and are stable for the
/// lifetime of the room, which makes them safe to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxId(pub u16);

impl BoxId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Largest box count a room may carry.
pub const MAX_BOXES: usize = 0x7FFF;

bitflags! {
    /// Per-box behaviour flags, settable by script at any time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct BoxFlags: u16 {
        /// 3-bit facing lock value, see [`BoxFlags::direction_lock`].
        const DIR_LOCK = 0x0007;
        const X_FLIP = 0x0008;
        const Y_FLIP = 0x0010;
        const PLAYER_ONLY = 0x0020;
        const LOCKED = 0x0040;
        const INVISIBLE = 0x0080;
        const IGNORE_SCALE = 0x0100;

        const _ = !0;
    }
}

impl BoxFlags {
    /// Facing lock: 0 none, 1 horizontal, 2 vertical, 3 left, 4 right, 5 away, 6 toward.
    pub fn direction_lock(self) -> u8 {
        (self.bits() & Self::DIR_LOCK.bits()) as u8
    }

    /// Whether the box is skipped by searches performed for this kind of actor.
    ///
    /// Invisible boxes stay reachable for the player when also flagged player-only.
    pub fn hidden_from(self, is_player: bool) -> bool {
        self.contains(Self::INVISIBLE) && !(self.contains(Self::PLAYER_ONLY) && is_player)
    }

    /// Whether an actor may not walk through the box.
    pub fn blocks(self, is_player: bool) -> bool {
        self.contains(Self::LOCKED) && !(self.contains(Self::PLAYER_ONLY) && is_player)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WalkBox {
    pub coords: BoxCoords,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: BoxFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale: BoxScale,
}

impl WalkBox {
    pub fn new(coords: BoxCoords) -> Self {
        Self {
            coords,
            flags: BoxFlags::empty(),
            scale: BoxScale::default(),
        }
    }

    pub fn with_flags(mut self, flags: BoxFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_scale(mut self, scale: BoxScale) -> Self {
        self.scale = scale;
        self
    }
}

/// Room-local box table plus the scale slots its boxes may reference.
///
/// Geometry is immutable after construction; flags and scales can change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxStore {
    boxes: Vec<WalkBox>,
    slots: Vec<ScaleSlot>,
}

impl BoxStore {
    pub fn new(boxes: Vec<WalkBox>, slots: Vec<ScaleSlot>) -> Result<Self, NavError> {
        if boxes.len() > MAX_BOXES {
            return Err(LoadError::TooManyBoxes(boxes.len()).into());
        }
        if slots.len() > MAX_SCALE_SLOTS {
            return Err(LoadError::TooManyScaleSlots(slots.len()).into());
        }
        for (i, slot) in slots.iter().enumerate() {
            if slot.is_degenerate() {
                return Err(NavError::DegenerateScaleSlot { slot: i as u8 });
            }
        }

        let store = Self { boxes, slots };
        for walkbox in &store.boxes {
            store.check_scale(walkbox.scale)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[WalkBox] {
        &self.boxes
    }

    pub fn scale_slots(&self) -> &[ScaleSlot] {
        &self.slots
    }

    /// All box ids in ascending order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = BoxId> + ExactSizeIterator {
        (0..self.boxes.len() as u16).map(BoxId)
    }

    pub fn get_box(&self, id: BoxId) -> Result<&WalkBox, NavError> {
        self.boxes.get(id.index()).ok_or(NavError::InvalidBoxId {
            id,
            count: self.boxes.len(),
        })
    }

    /// Lookup that treats unknown ids as "no box" instead of an error.
    pub fn walkbox(&self, id: BoxId) -> Option<&WalkBox> {
        self.boxes.get(id.index())
    }

    pub(crate) fn coords(&self, id: BoxId) -> BoxCoords {
        self.boxes[id.index()].coords
    }

    pub(crate) fn flags(&self, id: BoxId) -> BoxFlags {
        self.boxes[id.index()].flags
    }

    pub fn set_flags(&mut self, id: BoxId, flags: BoxFlags) -> Result<(), NavError> {
        let count = self.boxes.len();
        let walkbox = self
            .boxes
            .get_mut(id.index())
            .ok_or(NavError::InvalidBoxId { id, count })?;
        walkbox.flags = flags;
        Ok(())
    }

    pub fn set_scale(&mut self, id: BoxId, scale: BoxScale) -> Result<(), NavError> {
        self.check_scale(scale)?;
        let count = self.boxes.len();
        let walkbox = self
            .boxes
            .get_mut(id.index())
            .ok_or(NavError::InvalidBoxId { id, count })?;
        walkbox.scale = scale;
        Ok(())
    }

    /// Replace (or append, when `slot == len`) a scale ramp.
    pub fn set_scale_slot(&mut self, slot: u8, ramp: ScaleSlot) -> Result<(), NavError> {
        if ramp.is_degenerate() {
            return Err(NavError::DegenerateScaleSlot { slot });
        }
        let index = slot as usize;
        if index < self.slots.len() {
            self.slots[index] = ramp;
        } else if index == self.slots.len() && index < MAX_SCALE_SLOTS {
            self.slots.push(ramp);
        } else {
            return Err(NavError::InvalidScaleSlot {
                slot,
                count: self.slots.len(),
            });
        }
        Ok(())
    }

    /// Scale an actor standing at `p` inside box `id` should use.
    pub fn scale_at(&self, id: BoxId, p: Point) -> Result<u8, NavError> {
        let walkbox = self.get_box(id)?;
        Ok(match walkbox.scale {
            BoxScale::Fixed(value) => value,
            BoxScale::Slot(slot) => self
                .slots
                .get(slot as usize)
                .map(|ramp| ramp.scale_at(p))
                .unwrap_or(FULL_SCALE),
        })
    }

    fn check_scale(&self, scale: BoxScale) -> Result<(), NavError> {
        match scale {
            BoxScale::Slot(slot) if slot as usize >= self.slots.len() => {
                Err(NavError::InvalidScaleSlot {
                    slot,
                    count: self.slots.len(),
                })
            }
            _ => Ok(()),
        }
    }
}
