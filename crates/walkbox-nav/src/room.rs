use tracing::debug;

use crate::gate::{find_crossing, gate_between, Crossing};
use crate::geometry;
use crate::matrix::PathMatrix;
use crate::route::BoxRoute;
use crate::scale::{BoxScale, ScaleSlot};
use crate::search::{find_closest_box_and_point, AdjustedPoint, ScanOrder, SearchConfig};
use crate::{BoxFlags, BoxId, BoxStore, NavError, Point, RoomData, WalkBox};

/// A loaded room: its walkboxes plus the path matrix compiled from them.
///
/// The matrix is compiled once, when the room is built. Later flag or scale
/// changes update the boxes but leave the compiled routes untouched; call
/// [`Room::recompile`] to pick up new adjacency.
#[derive(Debug, Clone)]
pub struct Room {
    store: BoxStore,
    matrix: PathMatrix,
    search: SearchConfig,
}

impl Room {
    pub fn new(store: BoxStore) -> Self {
        Self::with_search(store, SearchConfig::default())
    }

    pub fn with_search(store: BoxStore, search: SearchConfig) -> Self {
        let matrix = PathMatrix::compile(&store);
        debug!(
            boxes = store.len(),
            scale_slots = store.scale_slots().len(),
            "room loaded"
        );
        Self {
            store,
            matrix,
            search,
        }
    }

    pub fn from_data(data: RoomData) -> Result<Self, NavError> {
        Ok(Self::new(BoxStore::new(data.boxes, data.scale_slots)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NavError> {
        Self::from_data(RoomData::from_bytes(bytes)?)
    }

    /// Rebuild the path matrix from the current flags.
    pub fn recompile(&mut self) {
        self.matrix = PathMatrix::compile(&self.store);
    }

    pub fn store(&self) -> &BoxStore {
        &self.store
    }

    pub fn matrix(&self) -> &PathMatrix {
        &self.matrix
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    pub fn box_count(&self) -> usize {
        self.store.len()
    }

    pub fn get_box(&self, id: BoxId) -> Result<&WalkBox, NavError> {
        self.store.get_box(id)
    }

    pub fn set_box_flags(&mut self, id: BoxId, flags: BoxFlags) -> Result<(), NavError> {
        self.store.set_flags(id, flags)
    }

    pub fn set_box_scale(&mut self, id: BoxId, scale: BoxScale) -> Result<(), NavError> {
        self.store.set_scale(id, scale)
    }

    pub fn set_scale_slot(&mut self, slot: u8, ramp: ScaleSlot) -> Result<(), NavError> {
        self.store.set_scale_slot(slot, ramp)
    }

    pub fn scale_at(&self, id: BoxId, p: Point) -> Result<u8, NavError> {
        self.store.scale_at(id, p)
    }

    pub fn point_in_box(&self, id: BoxId, p: Point) -> Result<bool, NavError> {
        Ok(geometry::point_in_box(&self.store.get_box(id)?.coords, p))
    }

    pub fn closest_point_on_box(&self, id: BoxId, p: Point) -> Result<(Point, u32), NavError> {
        Ok(geometry::closest_point_on_box(&self.store.get_box(id)?.coords, p))
    }

    pub fn find_closest_box_and_point(&self, p: Point, order: ScanOrder, is_player: bool) -> AdjustedPoint {
        find_closest_box_and_point(&self.store, p, order, is_player, &self.search)
    }

    /// Next box on a shortest route from `current` to `dest`; `None` when
    /// `dest` cannot be reached.
    pub fn next_hop(&self, current: BoxId, dest: BoxId) -> Result<Option<BoxId>, NavError> {
        self.store.get_box(current)?;
        self.store.get_box(dest)?;
        Ok(self.matrix.next_hop(current, dest))
    }

    /// Waypoints for crossing from `from` into the adjacent box `via`.
    pub fn crossing(
        &self,
        from: BoxId,
        via: BoxId,
        via_is_final: bool,
        pos: Point,
        dest: Point,
    ) -> Result<Crossing, NavError> {
        let from = self.store.get_box(from)?.coords;
        let via = self.store.get_box(via)?.coords;
        Ok(find_crossing(&from, &via, via_is_final, pos, dest))
    }

    /// Follow the path matrix from `from` to `to`, collecting every gate.
    pub fn route(&self, from: BoxId, to: BoxId) -> Result<Option<BoxRoute>, NavError> {
        self.store.get_box(from)?;
        self.store.get_box(to)?;

        let mut boxes = vec![from];
        let mut gates = Vec::new();
        let mut current = from;
        while current != to {
            // Every hop shortens the remaining distance, so more than N
            // hops can only mean a corrupt matrix.
            if boxes.len() > self.store.len() {
                return Ok(None);
            }
            let Some(next) = self.matrix.next_hop(current, to) else {
                return Ok(None);
            };
            gates.push(gate_between(&self.store.coords(current), &self.store.coords(next)));
            boxes.push(next);
            current = next;
        }
        Ok(Some(BoxRoute { boxes, gates }))
    }
}
