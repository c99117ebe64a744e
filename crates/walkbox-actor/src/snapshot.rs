//! Flat, integer-only save state for an actor's walk.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use walkbox_nav::{BoxId, Point, Room};

use crate::policy::{Leg, WalkSpeed};
use crate::walk::{WalkData, WalkState};
use crate::Actor;

/// Stored in place of a box id or facing that is not set.
pub const NO_ID: u16 = u16::MAX;

/// Everything needed to resume a walk tick-for-tick.
///
/// The compiled room is not part of it; restore against the same room.
/// Every field is an integer or a flag. Unset ids are [`NO_ID`], and
/// missing fields deserialize as zero except for ids, which default to
/// [`NO_ID`] (the state defaults to idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WalkSnapshot {
    pub x: i32,
    pub y: i32,
    pub facing: u16,
    pub target_facing: u16,
    pub scale: u8,
    pub speed_x: u16,
    pub speed_y: u16,
    pub ignore_boxes: bool,
    pub walkbox: u16,

    pub state: u8,
    pub dest_x: i32,
    pub dest_y: i32,
    pub dest_box: u16,
    pub dest_dir: u16,
    pub cur_box: u16,
    pub has_point3: bool,
    pub point3_x: i32,
    pub point3_y: i32,
    pub track_x: i32,
    pub track_y: i32,

    pub leg_cur_x: i32,
    pub leg_cur_y: i32,
    pub leg_next_x: i32,
    pub leg_next_y: i32,
    pub delta_x: i32,
    pub delta_y: i32,
    pub xfrac: u16,
    pub yfrac: u16,
    pub x_count: i32,
    pub y_count: i32,
    pub x_add: i32,
    pub y_add: i32,
    pub threshold: i32,
    pub leg_facing: u16,
}

impl Default for WalkSnapshot {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            facing: 0,
            target_facing: 0,
            scale: 0,
            speed_x: 0,
            speed_y: 0,
            ignore_boxes: false,
            walkbox: NO_ID,
            state: 0,
            dest_x: 0,
            dest_y: 0,
            dest_box: NO_ID,
            dest_dir: NO_ID,
            cur_box: NO_ID,
            has_point3: false,
            point3_x: 0,
            point3_y: 0,
            track_x: 0,
            track_y: 0,
            leg_cur_x: 0,
            leg_cur_y: 0,
            leg_next_x: 0,
            leg_next_y: 0,
            delta_x: 0,
            delta_y: 0,
            xfrac: 0,
            yfrac: 0,
            x_count: 0,
            y_count: 0,
            x_add: 0,
            y_add: 0,
            threshold: 0,
            leg_facing: 0,
        }
    }
}

fn encode_id(id: Option<u16>) -> u16 {
    id.unwrap_or(NO_ID)
}

fn decode_id(raw: u16) -> Option<u16> {
    (raw != NO_ID).then_some(raw)
}

impl Actor {
    pub fn snapshot(&self) -> WalkSnapshot {
        let walk = &self.walk;
        let leg = &walk.leg;
        let point3 = walk.point3.unwrap_or_default();
        WalkSnapshot {
            x: self.pos.x,
            y: self.pos.y,
            facing: self.facing,
            target_facing: self.target_facing,
            scale: self.scale,
            speed_x: self.speed.x,
            speed_y: self.speed.y,
            ignore_boxes: self.ignore_boxes,
            walkbox: encode_id(self.walkbox.map(|b| b.0)),

            state: walk.state.tag(),
            dest_x: walk.dest.x,
            dest_y: walk.dest.y,
            dest_box: encode_id(walk.dest_box.map(|b| b.0)),
            dest_dir: encode_id(walk.dest_dir),
            cur_box: encode_id(walk.cur_box.map(|b| b.0)),
            has_point3: walk.point3.is_some(),
            point3_x: point3.x,
            point3_y: point3.y,
            track_x: walk.track.x,
            track_y: walk.track.y,

            leg_cur_x: leg.cur.x,
            leg_cur_y: leg.cur.y,
            leg_next_x: leg.next.x,
            leg_next_y: leg.next.y,
            delta_x: leg.delta_x,
            delta_y: leg.delta_y,
            xfrac: leg.xfrac,
            yfrac: leg.yfrac,
            x_count: leg.x_count,
            y_count: leg.y_count,
            x_add: leg.x_add,
            y_add: leg.y_add,
            threshold: leg.threshold,
            leg_facing: leg.facing,
        }
    }

    /// Load a snapshot. Box ids the room does not know are dropped, points
    /// are clamped to room coordinates and a zero speed falls back to the
    /// configured default.
    pub fn restore(&mut self, room: &Room, snapshot: &WalkSnapshot) {
        let known = |raw: u16| decode_id(raw).map(BoxId).filter(|b| room.store().walkbox(*b).is_some());
        let point = |x: i32, y: i32| Point::new(x, y).clamp_to_room();

        let speed = WalkSpeed::new(snapshot.speed_x, snapshot.speed_y);
        self.pos = point(snapshot.x, snapshot.y);
        self.facing = snapshot.facing % 360;
        self.target_facing = snapshot.target_facing % 360;
        self.scale = snapshot.scale;
        self.speed = if speed.is_valid() { speed } else { self.config.speed };
        self.ignore_boxes = snapshot.ignore_boxes;
        self.walkbox = known(snapshot.walkbox);

        self.walk = WalkData {
            state: WalkState::from_tag(snapshot.state),
            dest: point(snapshot.dest_x, snapshot.dest_y),
            dest_box: known(snapshot.dest_box),
            dest_dir: decode_id(snapshot.dest_dir).map(|d| d % 360),
            cur_box: known(snapshot.cur_box),
            point3: snapshot
                .has_point3
                .then(|| point(snapshot.point3_x, snapshot.point3_y)),
            track: point(snapshot.track_x, snapshot.track_y),
            leg: Leg {
                cur: point(snapshot.leg_cur_x, snapshot.leg_cur_y),
                next: point(snapshot.leg_next_x, snapshot.leg_next_y),
                delta_x: snapshot.delta_x,
                delta_y: snapshot.delta_y,
                xfrac: snapshot.xfrac,
                yfrac: snapshot.yfrac,
                x_count: snapshot.x_count,
                y_count: snapshot.y_count,
                x_add: snapshot.x_add,
                y_add: snapshot.y_add,
                threshold: snapshot.threshold,
                facing: snapshot.leg_facing % 360,
            },
        };
    }
}
