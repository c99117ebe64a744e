use thiserror::Error;

use crate::BoxId;

/// Errors raised at the navigation API boundary.
///
/// None of these occur during ordinary per-tick simulation; they signal a
/// misbehaving caller or corrupt room data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("invalid box id {id:?} (room has {count} boxes)")]
    InvalidBoxId { id: BoxId, count: usize },

    #[error("invalid scale slot {slot} (room has {count} slots)")]
    InvalidScaleSlot { slot: u8, count: usize },

    #[error("scale slot {slot} spans a single point")]
    DegenerateScaleSlot { slot: u8 },

    #[error("room data: {0}")]
    Load(#[from] LoadError),
}

/// Errors produced while decoding room-local box records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("truncated data at offset {offset}: needed {needed} more bytes")]
    Truncated { offset: usize, needed: usize },

    #[error("too many boxes: {0}")]
    TooManyBoxes(usize),

    #[error("too many scale slots: {0}")]
    TooManyScaleSlots(usize),

    #[error("{0} trailing bytes after room data")]
    TrailingBytes(usize),
}
