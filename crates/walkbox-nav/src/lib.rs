//! Walkbox navigation for point-and-click rooms: box geometry, adjacency,
//! a precompiled next-hop matrix and the gates used to cross between boxes.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod adjacency;
pub mod boxes;
pub mod error;
pub mod gate;
pub mod geometry;
pub mod loader;
pub mod math;
pub mod matrix;
pub mod room;
pub mod route;
pub mod scale;
pub mod search;

pub use adjacency::{are_boxes_neighbors, CostMatrix};
pub use boxes::{BoxFlags, BoxId, BoxStore, WalkBox, MAX_BOXES};
pub use error::{LoadError, NavError};
pub use gate::{Crossing, Gate};
pub use loader::RoomData;
pub use math::{BoxCoords, Point};
pub use matrix::{CompileScratch, HopRange, PathMatrix};
pub use room::Room;
pub use route::BoxRoute;
pub use scale::{BoxScale, ScaleSlot, FULL_SCALE};
pub use search::{AdjustedPoint, ScanOrder, SearchConfig};
