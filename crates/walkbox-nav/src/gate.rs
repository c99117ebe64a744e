//! Gates between adjacent walkboxes and the waypoints used to cross them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{closest_point_on_box, closest_point_on_segment, compare_slope};
use crate::{BoxCoords, Point};

/// Distances (in pixels) below which two gate candidates are treated as the same line.
const GATE_TOLERANCE: u32 = 4;

/// The crossing between two adjacent boxes, as two segments: `from_side`
/// lies on the box being left, `via_side` on the box being entered.
///
/// `from_side[k]` and `via_side[k]` are paired ends of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gate {
    pub from_side: [Point; 2],
    pub via_side: [Point; 2],
}

/// How to move from the current box into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Crossing {
    /// The final destination can be walked to in a straight line.
    Direct,
    /// Walk to `point2` (when present) and then to `point3` in the next box.
    Via { point2: Option<Point>, point3: Point },
}

/// Compute the gate from `from` into `via`.
///
/// Eight candidates are considered: every corner of each box projected onto
/// the other box. The three shortest projections are kept and the pair that
/// lies on a common edge becomes the two gate ends.
pub fn gate_between(from: &BoxCoords, via: &BoxCoords) -> Gate {
    let mut corner = [Point::ZERO; 8];
    let mut closest = [Point::ZERO; 8];
    let mut dist = [0u32; 8];

    for (i, c) in from.corners().into_iter().enumerate() {
        corner[i] = c;
        (closest[i], dist[i]) = closest_point_on_box(via, c);
    }
    for (i, c) in via.corners().into_iter().enumerate() {
        corner[i + 4] = c;
        (closest[i + 4], dist[i + 4]) = closest_point_on_box(from, c);
    }

    let mut pick = [0usize; 3];
    let mut min_dist = [0u32; 3];
    let mut on_via = [false; 3];
    for j in 0..3 {
        let mut best = u32::MAX;
        for (i, &d) in dist.iter().enumerate() {
            if d < best {
                best = d;
                pick[j] = i;
            }
        }
        dist[pick[j]] = u32::MAX;
        min_dist[j] = best.isqrt();
        on_via[j] = pick[j] > 3;
    }

    let close = |a: usize, b: usize| min_dist[a].abs_diff(min_dist[b]) < GATE_TOLERANCE;
    let (line1, line2) = if on_via[0] == on_via[1] && close(0, 1) {
        (pick[0], pick[1])
    } else if on_via[0] == on_via[2] && min_dist[0] == min_dist[2] {
        (pick[0], pick[2])
    } else if on_via[1] == on_via[2] && min_dist[1] == min_dist[2] {
        (pick[1], pick[2])
    } else if on_via[0] == on_via[2] && close(0, 2) {
        (pick[0], pick[2])
    } else if close(0, 2) {
        (pick[1], pick[2])
    } else if close(0, 1) {
        (pick[0], pick[1])
    } else {
        (pick[0], pick[0])
    };

    let end = |line: usize| -> (Point, Point) {
        if line < 4 {
            (corner[line], closest[line])
        } else {
            (closest[line], corner[line])
        }
    };
    let (a_from, a_via) = end(line1);
    let (b_from, b_via) = end(line2);

    Gate {
        from_side: [a_from, b_from],
        via_side: [a_via, b_via],
    }
}

/// Waypoints for stepping from box `from` into the adjacent box `via`.
///
/// When `via` holds the final destination and the straight line `pos -> dest`
/// passes between both gate ends on both sides, the crossing is
/// [`Crossing::Direct`].
pub fn find_crossing(from: &BoxCoords, via: &BoxCoords, via_is_final: bool, pos: Point, dest: Point) -> Crossing {
    let gate = gate_between(from, via);
    let [a_from, b_from] = gate.from_side;
    let [a_via, b_via] = gate.via_side;

    if via_is_final
        && compare_slope(pos, dest, a_from) != compare_slope(pos, dest, b_from)
        && compare_slope(pos, dest, a_via) != compare_slope(pos, dest, b_via)
    {
        return Crossing::Direct;
    }

    let point3 = closest_point_on_segment(a_via, b_via, pos);
    let point2 = if compare_slope(pos, point3, a_from) == compare_slope(pos, point3, b_from) {
        Some(closest_point_on_segment(a_from, b_from, pos))
    } else {
        None
    };

    Crossing::Via { point2, point3 }
}
