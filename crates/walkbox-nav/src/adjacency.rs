//! Box adjacency: which pairs of walkboxes share a usable edge.

use crate::{BoxCoords, BoxFlags, BoxId, BoxStore};

/// Cost recorded for pairs with no shared edge.
pub const UNREACHABLE_COST: u8 = 255;

/// True when the two boxes share a positive-length stretch of a vertical or
/// horizontal edge.
///
/// Only axis-aligned edges can make boxes neighbours, and two edges touching
/// at a single point only count when one of them is itself a single point.
pub fn are_boxes_neighbors(first: &BoxCoords, second: &BoxCoords) -> bool {
    let mut outer = *second;
    for _ in 0..4 {
        let mut inner = *first;
        for _ in 0..4 {
            if shares_vertical_edge(&inner, &outer) || shares_horizontal_edge(&inner, &outer) {
                return true;
            }
            inner = inner.rotated();
        }
        outer = outer.rotated();
    }
    false
}

fn shares_vertical_edge(a: &BoxCoords, b: &BoxCoords) -> bool {
    let x = a.ul.x;
    if a.ur.x != x || b.ul.x != x || b.ur.x != x {
        return false;
    }
    spans_overlap(
        ordered(a.ul.y, a.ur.y),
        ordered(b.ul.y, b.ur.y),
    )
}

fn shares_horizontal_edge(a: &BoxCoords, b: &BoxCoords) -> bool {
    let y = a.ul.y;
    if a.ur.y != y || b.ul.y != y || b.ur.y != y {
        return false;
    }
    spans_overlap(
        ordered(a.ul.x, a.ur.x),
        ordered(b.ul.x, b.ur.x),
    )
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn spans_overlap((a_lo, a_hi): (i32, i32), (b_lo, b_hi): (i32, i32)) -> bool {
    if b_hi < a_lo || b_lo > a_hi {
        return false;
    }
    let touch_only = b_lo == a_hi || b_hi == a_lo;
    !(touch_only && a_lo != a_hi && b_lo != b_hi)
}

/// Dense `N x N` step costs: 0 on the diagonal, 1 between neighbours,
/// [`UNREACHABLE_COST`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    count: usize,
    cells: Vec<u8>,
}

impl CostMatrix {
    /// Build from the store's current geometry and flags. Invisible boxes get
    /// no neighbours.
    pub fn build(store: &BoxStore) -> Self {
        let count = store.len();
        let mut cells = vec![UNREACHABLE_COST; count * count];

        for i in store.ids() {
            cells[i.index() * count + i.index()] = 0;
            if store.flags(i).contains(BoxFlags::INVISIBLE) {
                continue;
            }
            let a = store.coords(i);
            for j in store.ids().skip(i.index() + 1) {
                if store.flags(j).contains(BoxFlags::INVISIBLE) {
                    continue;
                }
                if are_boxes_neighbors(&a, &store.coords(j)) {
                    cells[i.index() * count + j.index()] = 1;
                    cells[j.index() * count + i.index()] = 1;
                }
            }
        }

        Self { count, cells }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn cost(&self, from: BoxId, to: BoxId) -> u8 {
        self.cells[from.index() * self.count + to.index()]
    }

    pub fn is_adjacent(&self, from: BoxId, to: BoxId) -> bool {
        from != to && self.cost(from, to) != UNREACHABLE_COST
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn rectangles_sharing_an_edge_are_neighbors() {
        let a = BoxCoords::rect(0, 0, 100, 50);
        let b = BoxCoords::rect(100, 10, 200, 40);
        assert!(are_boxes_neighbors(&a, &b));
        assert!(are_boxes_neighbors(&b, &a));
    }

    #[test]
    fn corner_touch_is_not_adjacency() {
        let a = BoxCoords::rect(0, 0, 100, 50);
        let b = BoxCoords::rect(100, 50, 200, 90);
        assert!(!are_boxes_neighbors(&a, &b));
    }

    #[test]
    fn point_edge_touching_an_edge_end_counts() {
        let a = BoxCoords::rect(0, 0, 100, 50);
        let stair = BoxCoords::line(Point::new(100, 50), Point::new(150, 80));
        assert!(are_boxes_neighbors(&a, &stair));
    }

    #[test]
    fn slanted_shared_edges_do_not_count() {
        let a = BoxCoords::new(
            Point::new(0, 0),
            Point::new(50, 0),
            Point::new(80, 50),
            Point::new(0, 50),
        );
        let b = BoxCoords::new(
            Point::new(50, 0),
            Point::new(120, 0),
            Point::new(120, 50),
            Point::new(80, 50),
        );
        assert!(!are_boxes_neighbors(&a, &b));
    }
}
