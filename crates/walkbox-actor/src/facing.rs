//! Facing angles and the rules boxes impose on them.
//!
//! Angles are degrees clockwise from "away from the camera": 0 away, 90 right,
//! 180 toward the camera, 270 left. Turning happens in quarter steps.

use walkbox_nav::BoxFlags;

pub const AWAY: u16 = 0;
pub const RIGHT: u16 = 90;
pub const TOWARD: u16 = 180;
pub const LEFT: u16 = 270;

/// Canonical angle per quadrant index (see [`quadrant`]).
const QUADRANT_ANGLES: [u16; 4] = [LEFT, RIGHT, TOWARD, AWAY];

/// Next quadrant when turning, indexed by `target | facing << 2`. Opposite
/// facings turn through an intermediate quadrant.
const TURN_TABLE: [u8; 16] = [0, 2, 2, 3, 2, 1, 2, 3, 0, 1, 2, 1, 0, 1, 0, 3];

pub fn normalize(dir: i32) -> u16 {
    dir.rem_euclid(360) as u16
}

/// Quadrant index of an angle: 0 left, 1 right, 2 toward, 3 away.
pub fn quadrant(dir: u16) -> usize {
    match dir % 360 {
        71..=109 => 1,
        110..=251 => 2,
        252..=289 => 0,
        _ => 3,
    }
}

pub fn quadrant_angle(quadrant: usize) -> u16 {
    QUADRANT_ANGLES[quadrant & 3]
}

/// One quarter-step turn from `facing` toward `target`, snapped to a canonical angle.
pub fn turn_step(facing: u16, target: u16) -> u16 {
    let index = quadrant(target) | (quadrant(facing) << 2);
    quadrant_angle(TURN_TABLE[index] as usize)
}

/// Facing for a walk leg with the given per-axis differences.
pub fn leg_facing(diff_x: i32, diff_y: i32, toward: bool, right: bool) -> u16 {
    if diff_y.abs() * 3 > diff_x.abs() {
        if toward {
            TOWARD
        } else {
            AWAY
        }
    } else if right {
        RIGHT
    } else {
        LEFT
    }
}

/// A facing after box rules were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remapped {
    pub dir: u16,
    /// False when a box lock dictates the facing outright (no turning animation).
    pub interpolate: bool,
}

/// Apply a box's flip flags and facing lock to `dir`.
///
/// `moving_right` / `moving_down` describe the current leg and only matter
/// for walking actors on horizontally or vertically locked boxes.
pub fn remap_for_box(dir: u16, flags: BoxFlags, walking: bool, moving_right: bool, moving_down: bool) -> Remapped {
    let mut dir = dir as i32;
    let mut flip_x = moving_right;
    let mut flip_y = moving_down;

    if flags.contains(BoxFlags::X_FLIP) {
        dir = 360 - dir;
        flip_x = !flip_x;
    }
    if flags.contains(BoxFlags::Y_FLIP) {
        dir = 180 - dir;
        flip_y = !flip_y;
    }

    let locked = match flags.direction_lock() {
        1 if walking => Some(if flip_x { RIGHT } else { LEFT }),
        1 => Some(if dir == RIGHT as i32 { RIGHT } else { LEFT }),
        2 if walking => Some(if flip_y { TOWARD } else { AWAY }),
        2 => Some(if dir == AWAY as i32 { AWAY } else { TOWARD }),
        3 => Some(LEFT),
        4 => Some(RIGHT),
        5 => Some(AWAY),
        6 => Some(TOWARD),
        _ => None,
    };

    match locked {
        Some(dir) => Remapped {
            dir,
            interpolate: false,
        },
        None => Remapped {
            dir: normalize(dir),
            interpolate: true,
        },
    }
}

/// The facing to show next: remap `target` for the box, then take one turn
/// step from `facing` unless a lock snaps it.
pub fn next_facing(
    facing: u16,
    target: u16,
    flags: BoxFlags,
    walking: bool,
    moving_right: bool,
    moving_down: bool,
) -> u16 {
    let remapped = remap_for_box(target, flags, walking, moving_right, moving_down);
    if remapped.interpolate {
        turn_step(facing, remapped.dir)
    } else {
        remapped.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_facings_turn_through_an_intermediate() {
        assert_eq!(turn_step(RIGHT, LEFT), TOWARD);
        assert_eq!(turn_step(TOWARD, LEFT), LEFT);
        assert_eq!(turn_step(AWAY, TOWARD), LEFT);
        assert_eq!(turn_step(TOWARD, AWAY), RIGHT);
        assert_eq!(turn_step(LEFT, LEFT), LEFT);
    }

    #[test]
    fn quadrant_boundaries() {
        assert_eq!(quadrant(70), 3);
        assert_eq!(quadrant(71), 1);
        assert_eq!(quadrant(109), 1);
        assert_eq!(quadrant(110), 2);
        assert_eq!(quadrant(289), 0);
        assert_eq!(quadrant(290), 3);
        assert_eq!(normalize(-90), LEFT);
    }

    #[test]
    fn flips_mirror_the_angle() {
        let flags = BoxFlags::X_FLIP;
        assert_eq!(remap_for_box(RIGHT, flags, false, false, false).dir, LEFT);
        let flags = BoxFlags::Y_FLIP;
        assert_eq!(remap_for_box(AWAY, flags, false, false, false).dir, TOWARD);
    }

    #[test]
    fn locks_snap_without_interpolation() {
        let horizontal = BoxFlags::from_bits_retain(1);
        assert_eq!(
            remap_for_box(TOWARD, horizontal, true, true, false),
            Remapped { dir: RIGHT, interpolate: false }
        );
        assert_eq!(remap_for_box(TOWARD, horizontal, false, true, false).dir, LEFT);

        let vertical = BoxFlags::from_bits_retain(2);
        assert_eq!(remap_for_box(RIGHT, vertical, true, false, true).dir, TOWARD);
        assert_eq!(remap_for_box(AWAY, vertical, false, false, true).dir, AWAY);

        let toward = BoxFlags::from_bits_retain(6);
        assert_eq!(next_facing(LEFT, RIGHT, toward, false, false, false), TOWARD);
    }
}
