//! Box scale values and linear scale ramps ("scale slots").

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Point;

/// Full-size scale; sprites and walk steps are unscaled.
pub const FULL_SCALE: u8 = 0xFF;

/// Maximum number of scale slots a room may define.
pub const MAX_SCALE_SLOTS: usize = 8;

const SLOT_BIT: u16 = 0x8000;

/// How a box derives an actor's scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoxScale {
    /// Constant scale across the whole box.
    Fixed(u8),
    /// Zero-based index of a room scale slot, evaluated at the actor position.
    Slot(u8),
}

impl Default for BoxScale {
    fn default() -> Self {
        BoxScale::Fixed(FULL_SCALE)
    }
}

impl BoxScale {
    /// Decode the on-disk form: `0x8000 | slot` for ramps, otherwise a fixed value.
    pub fn from_raw(raw: u16) -> Self {
        if raw & SLOT_BIT != 0 {
            BoxScale::Slot((raw & 0x7FFF) as u8)
        } else {
            BoxScale::Fixed(raw.min(FULL_SCALE as u16) as u8)
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            BoxScale::Fixed(value) => value as u16,
            BoxScale::Slot(slot) => SLOT_BIT | slot as u16,
        }
    }
}

/// A linear scale ramp between two reference points.
///
/// When only `y1 != y2` the ramp is vertical (the common "depth" case); when
/// both axes differ the horizontal and vertical interpolations are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleSlot {
    pub x1: i32,
    pub y1: i32,
    pub scale1: i32,
    pub x2: i32,
    pub y2: i32,
    pub scale2: i32,
}

impl ScaleSlot {
    /// Vertical ramp from `scale1` at `y1` to `scale2` at `y2`.
    pub const fn vertical(y1: i32, scale1: i32, y2: i32, scale2: i32) -> Self {
        Self {
            x1: 0,
            y1,
            scale1,
            x2: 0,
            y2,
            scale2,
        }
    }

    /// A slot whose two reference points coincide cannot be evaluated.
    pub fn is_degenerate(&self) -> bool {
        self.x1 == self.x2 && self.y1 == self.y2
    }

    /// Evaluate the ramp at `p`, clamped to `1..=255`.
    pub fn scale_at(&self, p: Point) -> u8 {
        if self.is_degenerate() {
            return FULL_SCALE;
        }

        let (x1, y1, x2, y2) = (self.x1 as i64, self.y1 as i64, self.x2 as i64, self.y2 as i64);
        let (scale1, scale2) = (self.scale1 as i64, self.scale2 as i64);
        let span = scale2 - scale1;
        let mut scale_y = 0;
        if y1 != y2 {
            let y = (p.y as i64).max(0);
            scale_y = span * (y - y1) / (y2 - y1) + scale1;
        }

        let scale = if x1 == x2 {
            scale_y
        } else {
            let scale_x = span * (p.x as i64 - x1) / (x2 - x1) + scale1;
            if y1 == y2 {
                scale_x
            } else {
                (scale_x + scale_y) / 2
            }
        };

        scale.clamp(1, FULL_SCALE as i64) as u8
    }
}
