//! Closest walkbox search: which box (and which point in it) an arbitrary room
//! coordinate should snap to.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{closest_point_on_box, point_in_box, quick_reject};
use crate::{BoxId, BoxStore, Point};

/// Order in which candidate boxes are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScanOrder {
    /// Ascending ids, single pass; the first containing box wins.
    PrioritizeLowId,
    /// Descending ids, one pass per distance threshold, with quick rejection.
    #[default]
    Thresholded,
}

/// Tunables for [`find_closest_box_and_point`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Pixel thresholds for [`ScanOrder::Thresholded`]; `0` disables rejection
    /// and always terminates the search. An unbounded pass is implied at the end.
    pub thresholds: Vec<i32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![30, 80, 0],
        }
    }
}

/// Outcome of a closest-box search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdjustedPoint {
    pub point: Point,
    /// `None` when no box is eligible; `point` is then the query unchanged.
    pub walkbox: Option<BoxId>,
}

impl AdjustedPoint {
    fn unmatched(point: Point) -> Self {
        Self {
            point,
            walkbox: None,
        }
    }
}

/// Snap `p` into the room's walkable area.
///
/// Boxes hidden from the caller (see [`crate::BoxFlags::hidden_from`]) are
/// skipped. A containing box returns `p` unchanged; otherwise the closest
/// boundary point of the nearest eligible box is returned.
pub fn find_closest_box_and_point(
    store: &BoxStore,
    p: Point,
    order: ScanOrder,
    is_player: bool,
    config: &SearchConfig,
) -> AdjustedPoint {
    match order {
        ScanOrder::PrioritizeLowId => scan_low_ids_first(store, p, is_player),
        ScanOrder::Thresholded => scan_thresholded(store, p, is_player, &config.thresholds),
    }
}

fn scan_low_ids_first(store: &BoxStore, p: Point, is_player: bool) -> AdjustedPoint {
    let mut best = AdjustedPoint::unmatched(p);
    let mut best_dist = u32::MAX;

    for id in store.ids() {
        if store.flags(id).hidden_from(is_player) {
            continue;
        }
        let coords = store.coords(id);
        if point_in_box(&coords, p) {
            return AdjustedPoint {
                point: p,
                walkbox: Some(id),
            };
        }
        let (q, d) = closest_point_on_box(&coords, p);
        if d < best_dist {
            best_dist = d;
            best = AdjustedPoint {
                point: q,
                walkbox: Some(id),
            };
        }
    }

    best
}

fn scan_thresholded(store: &BoxStore, p: Point, is_player: bool, thresholds: &[i32]) -> AdjustedPoint {
    let mut best = AdjustedPoint::unmatched(p);

    // A trailing unbounded pass runs whenever the configured ones end inconclusively.
    for threshold in thresholds.iter().copied().chain(std::iter::once(0)) {
        let mut best_dist = u32::MAX;
        best = AdjustedPoint::unmatched(p);

        for id in store.ids().rev() {
            if store.flags(id).hidden_from(is_player) {
                continue;
            }
            let coords = store.coords(id);
            if threshold > 0 && quick_reject(&coords, p, threshold) {
                continue;
            }
            if point_in_box(&coords, p) {
                return AdjustedPoint {
                    point: p,
                    walkbox: Some(id),
                };
            }
            let (q, d) = closest_point_on_box(&coords, p);
            if d < best_dist {
                best = AdjustedPoint {
                    point: q,
                    walkbox: Some(id),
                };
                if d == 0 {
                    return best;
                }
                best_dist = d;
            }
        }

        let limit = (threshold as i64) * (threshold as i64);
        if threshold == 0 || limit >= best_dist as i64 {
            return best;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxCoords, BoxFlags, WalkBox};

    fn store(boxes: Vec<WalkBox>) -> BoxStore {
        BoxStore::new(boxes, Vec::new()).unwrap()
    }

    #[test]
    fn containment_wins_regardless_of_order() {
        let s = store(vec![
            WalkBox::new(BoxCoords::rect(0, 0, 50, 50)),
            WalkBox::new(BoxCoords::rect(40, 0, 100, 50)),
        ]);
        let config = SearchConfig::default();
        let p = Point::new(45, 10);

        let low = find_closest_box_and_point(&s, p, ScanOrder::PrioritizeLowId, false, &config);
        assert_eq!(low.walkbox, Some(BoxId(0)));
        assert_eq!(low.point, p);

        let high = find_closest_box_and_point(&s, p, ScanOrder::Thresholded, false, &config);
        assert_eq!(high.walkbox, Some(BoxId(1)));
        assert_eq!(high.point, p);
    }

    #[test]
    fn far_points_fall_through_to_the_unbounded_pass() {
        let s = store(vec![WalkBox::new(BoxCoords::rect(0, 0, 10, 10))]);
        let hit = find_closest_box_and_point(
            &s,
            Point::new(200, 5),
            ScanOrder::Thresholded,
            false,
            &SearchConfig::default(),
        );
        assert_eq!(hit.walkbox, Some(BoxId(0)));
        assert_eq!(hit.point, Point::new(10, 5));
    }

    #[test]
    fn invisible_boxes_are_skipped_unless_player_only_for_player() {
        let hidden = BoxFlags::INVISIBLE | BoxFlags::PLAYER_ONLY;
        let s = store(vec![
            WalkBox::new(BoxCoords::rect(0, 0, 10, 10)),
            WalkBox::new(BoxCoords::rect(100, 0, 110, 10)).with_flags(hidden),
        ]);
        let config = SearchConfig::default();
        let p = Point::new(105, 5);

        let npc = find_closest_box_and_point(&s, p, ScanOrder::Thresholded, false, &config);
        assert_eq!(npc.walkbox, Some(BoxId(0)));

        let player = find_closest_box_and_point(&s, p, ScanOrder::Thresholded, true, &config);
        assert_eq!(player.walkbox, Some(BoxId(1)));
    }

    #[test]
    fn empty_room_leaves_point_unmatched() {
        let s = store(Vec::new());
        let p = Point::new(3, 4);
        let hit = find_closest_box_and_point(&s, p, ScanOrder::PrioritizeLowId, false, &SearchConfig::default());
        assert_eq!(hit, AdjustedPoint { point: p, walkbox: None });
    }

    #[test]
    fn thresholds_without_a_final_zero_still_find_a_box() {
        let s = store(vec![WalkBox::new(BoxCoords::rect(0, 0, 100, 50))]);
        let p = Point::new(400, 300);
        for thresholds in [Vec::new(), vec![30], vec![10, 20]] {
            let config = SearchConfig { thresholds };
            let hit = find_closest_box_and_point(&s, p, ScanOrder::Thresholded, false, &config);
            assert_eq!(hit.walkbox, Some(BoxId(0)), "{config:?}");
            assert_eq!(hit.point, Point::new(100, 50));
        }
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let s = store(vec![WalkBox::new(BoxCoords::rect(0, 0, 100, 50))]);
        let config = SearchConfig::default();
        for p in [
            Point::new(i32::MIN, 10),
            Point::new(i32::MAX, i32::MAX),
            Point::new(50, i32::MIN),
        ] {
            for order in [ScanOrder::Thresholded, ScanOrder::PrioritizeLowId] {
                let hit = find_closest_box_and_point(&s, p, order, false, &config);
                assert_eq!(hit.walkbox, Some(BoxId(0)));
                assert!(point_in_box(&BoxCoords::rect(0, 0, 100, 50), hit.point), "{p:?} -> {hit:?}");
            }
        }
    }
}
