//! Room-local box records: the little-endian binary layout and its
//! structured (serde) counterpart.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scale::{BoxScale, ScaleSlot, MAX_SCALE_SLOTS};
use crate::{BoxCoords, BoxFlags, LoadError, Point, WalkBox, MAX_BOXES};

/// Bytes per box record: 8 coordinates, flags and scale.
const BOX_RECORD_LEN: usize = 8 * 2 + 2 + 2;
/// Bytes per scale slot record.
const SLOT_RECORD_LEN: usize = 6 * 2;

/// Decoded room walk data, before validation into a [`crate::BoxStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoomData {
    pub boxes: Vec<WalkBox>,
    pub scale_slots: Vec<ScaleSlot>,
}

impl RoomData {
    /// Decode the binary layout:
    ///
    /// ```text
    /// u16 box_count
    /// box_count x { i16 ul.x ul.y ur.x ur.y lr.x lr.y ll.x ll.y, u16 flags, u16 scale }
    /// u8 slot_count
    /// slot_count x { i16 x1 y1 scale1 x2 y2 scale2 }
    /// ```
    ///
    /// The slot section may be omitted entirely (no slots).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let mut reader = ByteReader::new(bytes);

        let count = reader.u16()? as usize;
        if count > MAX_BOXES {
            return Err(LoadError::TooManyBoxes(count));
        }
        reader.require(count * BOX_RECORD_LEN)?;

        let mut boxes = Vec::with_capacity(count);
        for _ in 0..count {
            let mut corners = [Point::ZERO; 4];
            for corner in &mut corners {
                *corner = Point::new(reader.i16()? as i32, reader.i16()? as i32);
            }
            let [ul, ur, lr, ll] = corners;
            let flags = BoxFlags::from_bits_retain(reader.u16()?);
            let scale = BoxScale::from_raw(reader.u16()?);
            boxes.push(WalkBox {
                coords: BoxCoords::new(ul, ur, lr, ll),
                flags,
                scale,
            });
        }

        let mut scale_slots = Vec::new();
        if !reader.is_empty() {
            let slots = reader.u8()? as usize;
            if slots > MAX_SCALE_SLOTS {
                return Err(LoadError::TooManyScaleSlots(slots));
            }
            reader.require(slots * SLOT_RECORD_LEN)?;
            for _ in 0..slots {
                scale_slots.push(ScaleSlot {
                    x1: reader.i16()? as i32,
                    y1: reader.i16()? as i32,
                    scale1: reader.i16()? as i32,
                    x2: reader.i16()? as i32,
                    y2: reader.i16()? as i32,
                    scale2: reader.i16()? as i32,
                });
            }
        }

        if !reader.is_empty() {
            return Err(LoadError::TrailingBytes(reader.remaining()));
        }

        Ok(Self { boxes, scale_slots })
    }

    /// Encode to the layout read by [`RoomData::from_bytes`]. Coordinates are
    /// truncated to 16 bits.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            2 + self.boxes.len() * BOX_RECORD_LEN + 1 + self.scale_slots.len() * SLOT_RECORD_LEN,
        );
        out.extend_from_slice(&(self.boxes.len() as u16).to_le_bytes());
        for walkbox in &self.boxes {
            for corner in walkbox.coords.corners() {
                out.extend_from_slice(&(corner.x as i16).to_le_bytes());
                out.extend_from_slice(&(corner.y as i16).to_le_bytes());
            }
            out.extend_from_slice(&walkbox.flags.bits().to_le_bytes());
            out.extend_from_slice(&walkbox.scale.to_raw().to_le_bytes());
        }
        out.push(self.scale_slots.len() as u8);
        for slot in &self.scale_slots {
            for v in [slot.x1, slot.y1, slot.scale1, slot.x2, slot.y2, slot.scale2] {
                out.extend_from_slice(&(v as i16).to_le_bytes());
            }
        }
        out
    }
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn require(&self, len: usize) -> Result<(), LoadError> {
        if self.remaining() < len {
            return Err(LoadError::Truncated {
                offset: self.offset,
                needed: len - self.remaining(),
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], LoadError> {
        self.require(N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8, LoadError> {
        Ok(self.take::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, LoadError> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    fn i16(&mut self) -> Result<i16, LoadError> {
        Ok(i16::from_le_bytes(self.take()?))
    }
}
