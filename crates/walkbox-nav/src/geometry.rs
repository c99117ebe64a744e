//! Pure integer geometry over walkbox quadrilaterals.
//!
//! Everything here works on exact integer coordinates so results are
//! identical across platforms and across save/restore.

use crate::{BoxCoords, Point};

/// Squared pixel distance within which a point counts as lying on a line box.
pub const LINE_BOX_TOLERANCE: u32 = 4;

/// Edge-side test: true when `p` lies on the inner (or the same) side of the
/// oriented edge `a -> b` for a clockwise box.
pub fn compare_slope(a: Point, b: Point, p: Point) -> bool {
    let (ax, ay) = (a.x as i64, a.y as i64);
    let lhs = (b.y as i64 - ay) * (p.x as i64 - ax);
    let rhs = (p.y as i64 - ay) * (b.x as i64 - ax);
    lhs <= rhs
}

/// Closest point to `p` on the segment `start -> end`.
///
/// The projection is computed with (wide) integer arithmetic and then clamped
/// to the segment along its dominant axis. A zero-length segment yields `start`.
pub fn closest_point_on_segment(start: Point, end: Point, p: Point) -> Point {
    let lxdiff = end.x as i128 - start.x as i128;
    let lydiff = end.y as i128 - start.y as i128;
    let (sx, sy) = (start.x as i128, start.y as i128);
    let (px, py) = (p.x as i128, p.y as i128);
    let coord = |v: i128| v.clamp(i32::MIN as i128, i32::MAX as i128) as i32;

    let mut result = if lxdiff == 0 {
        Point::new(start.x, p.y)
    } else if lydiff == 0 {
        Point::new(p.x, start.y)
    } else {
        let dist = lxdiff * lxdiff + lydiff * lydiff;
        if lxdiff.abs() > lydiff.abs() {
            let a = sx * lydiff / lxdiff;
            let b = px * lxdiff / lydiff;
            let c = (a + b - sy + py) * lydiff * lxdiff / dist;
            Point::new(coord(c), coord(c * lydiff / lxdiff - a + sy))
        } else {
            let a = sy * lxdiff / lydiff;
            let b = py * lydiff / lxdiff;
            let c = (a + b - sx + px) * lydiff * lxdiff / dist;
            Point::new(coord(c * lxdiff / lydiff - a + sx), coord(c))
        }
    };

    if lydiff.abs() < lxdiff.abs() {
        if lxdiff > 0 {
            if result.x < start.x {
                result = start;
            } else if result.x > end.x {
                result = end;
            }
        } else if result.x > start.x {
            result = start;
        } else if result.x < end.x {
            result = end;
        }
    } else if lydiff > 0 {
        if result.y < start.y {
            result = start;
        } else if result.y > end.y {
            result = end;
        }
    } else if result.y > start.y {
        result = start;
    } else if result.y < end.y {
        result = end;
    }

    result
}

fn outside_bounds(coords: &BoxCoords, p: Point) -> bool {
    let c = coords.corners();
    c.iter().all(|q| p.x < q.x)
        || c.iter().all(|q| p.x > q.x)
        || c.iter().all(|q| p.y < q.y)
        || c.iter().all(|q| p.y > q.y)
}

/// Containment test for a (possibly degenerate) walkbox.
pub fn point_in_box(coords: &BoxCoords, p: Point) -> bool {
    if outside_bounds(coords, p) {
        return false;
    }

    // Ramps and stair edges: accept points hugging the segment.
    if coords.is_line() {
        let on_line = closest_point_on_segment(coords.ul, coords.lr, p);
        if p.sqr_dist(on_line) <= LINE_BOX_TOLERANCE {
            return true;
        }
    }

    coords
        .edges()
        .into_iter()
        .all(|(a, b)| compare_slope(a, b, p))
}

/// Cheap pre-filter: true when `p` is more than `threshold` pixels beyond every
/// corner along some axis, so the box cannot be within `threshold` of it.
pub fn quick_reject(coords: &BoxCoords, p: Point, threshold: i32) -> bool {
    let c = coords.corners();
    let (px, py, threshold) = (p.x as i64, p.y as i64, threshold as i64);

    let t = px - threshold;
    if c.iter().all(|q| t > q.x as i64) {
        return true;
    }
    let t = px + threshold;
    if c.iter().all(|q| t < q.x as i64) {
        return true;
    }
    let t = py - threshold;
    if c.iter().all(|q| t > q.y as i64) {
        return true;
    }
    let t = py + threshold;
    c.iter().all(|q| t < q.y as i64)
}

/// Closest point to `p` on the boundary of the box, with its squared distance
/// (saturating at [`crate::math::FAR_DISTANCE`]).
///
/// The result always satisfies [`point_in_box`] and is never farther from `p`
/// than any corner.
pub fn closest_point_on_box(coords: &BoxCoords, p: Point) -> (Point, u32) {
    let mut best = coords.ul;
    let mut best_dist = u32::MAX;
    for (a, b) in coords.edges() {
        let q = closest_point_on_segment(a, b, p);
        let d = p.sqr_dist(q);
        if d < best_dist {
            best = q;
            best_dist = d;
        }
    }

    // Integer projection onto a slanted edge can land one pixel outside.
    if !point_in_box(coords, best) {
        (best, best_dist) = nudge_inside(coords, best, p);
    }

    for corner in coords.corners() {
        let d = p.sqr_dist(corner);
        if d < best_dist {
            best = corner;
            best_dist = d;
        }
    }

    (best, best_dist)
}

fn nudge_inside(coords: &BoxCoords, candidate: Point, p: Point) -> (Point, u32) {
    let mut found: Option<(Point, u32)> = None;
    for dy in -1..=1 {
        for dx in -1..=1 {
            let q = Point::new(candidate.x.saturating_add(dx), candidate.y.saturating_add(dy));
            if !point_in_box(coords, q) {
                continue;
            }
            let d = p.sqr_dist(q);
            match found {
                Some((_, best)) if best <= d => {}
                _ => found = Some((q, d)),
            }
        }
    }

    found.unwrap_or((coords.ul, p.sqr_dist(coords.ul)))
}
