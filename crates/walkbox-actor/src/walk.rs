//! The per-actor walk state machine.
//!
//! A walk is a sequence of straight legs. Each leg ends at a gate waypoint
//! between two boxes or, for the last leg, at the destination itself. Route
//! resolution happens between legs and is bounded per tick.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tracing::{debug, warn};

use walkbox_nav::{BoxFlags, BoxId, Crossing, Point, Room};

use crate::facing;
use crate::policy::{Leg, StepOutcome};
use crate::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WalkState {
    #[default]
    Idle,
    /// A destination was set; the route is resolved on the next tick.
    NewLeg,
    /// Walking toward a gate waypoint.
    InLeg,
    /// Walking the final straight line to the destination.
    LastLeg,
    /// Turning in place toward the target facing.
    Turning,
}

impl WalkState {
    pub fn tag(self) -> u8 {
        match self {
            WalkState::Idle => 0,
            WalkState::NewLeg => 1,
            WalkState::InLeg => 2,
            WalkState::LastLeg => 3,
            WalkState::Turning => 4,
        }
    }

    /// Unknown tags decode as [`WalkState::Idle`].
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            1 => WalkState::NewLeg,
            2 => WalkState::InLeg,
            3 => WalkState::LastLeg,
            4 => WalkState::Turning,
            _ => WalkState::Idle,
        }
    }

    pub fn is_walking(self) -> bool {
        matches!(self, WalkState::NewLeg | WalkState::InLeg | WalkState::LastLeg)
    }
}

/// Result of one [`Actor::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    Idle,
    Walking,
    Turning,
}

impl From<WalkState> for WalkStatus {
    fn from(state: WalkState) -> Self {
        match state {
            WalkState::Idle => WalkStatus::Idle,
            WalkState::Turning => WalkStatus::Turning,
            WalkState::NewLeg | WalkState::InLeg | WalkState::LastLeg => WalkStatus::Walking,
        }
    }
}

/// Route bookkeeping for the walk in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WalkData {
    pub(crate) state: WalkState,
    pub(crate) dest: Point,
    pub(crate) dest_box: Option<BoxId>,
    pub(crate) dest_dir: Option<u16>,
    /// Box the actor is heading into (equal to the walkbox between legs).
    pub(crate) cur_box: Option<BoxId>,
    /// Pending second gate waypoint.
    pub(crate) point3: Option<Point>,
    /// Unconstrained position the policy steps; `pos` is this kept in a box.
    pub(crate) track: Point,
    pub(crate) leg: Leg,
}

impl Actor {
    pub(crate) fn run_walk(&mut self, room: &Room) {
        match self.walk.state {
            WalkState::Idle => {}
            WalkState::Turning => self.turn_tick(room),
            WalkState::NewLeg => self.resolve(room),
            WalkState::InLeg | WalkState::LastLeg => {
                if self.advance(room) {
                    return;
                }
                if self.walk.state == WalkState::LastLeg {
                    self.set_box(room, self.walk.dest_box);
                    self.finish_walk();
                    return;
                }
                if let Some(point3) = self.walk.point3.take() {
                    if self.begin_leg(room, point3) {
                        return;
                    }
                }
                self.set_box(room, self.walk.cur_box);
                self.resolve(room);
            }
        }
    }

    /// Pick the next leg, crossing as many boxes as needed until one leg has
    /// actual distance to cover.
    fn resolve(&mut self, room: &Room) {
        for _ in 0..self.config.max_resolve_iterations.max(1) {
            let Some(walkbox) = self.walkbox else {
                self.set_box(room, self.walk.dest_box);
                self.walk.cur_box = self.walk.dest_box;
                return self.start_last_leg(room);
            };
            let Some(dest_box) = self.walk.dest_box else {
                return self.start_last_leg(room);
            };
            if walkbox == dest_box {
                return self.start_last_leg(room);
            }

            let next = match room.next_hop(walkbox, dest_box) {
                Ok(Some(next)) if !self.blocked_by(room, next) => next,
                _ => return self.stop_early(room, walkbox),
            };
            self.walk.cur_box = Some(next);

            let crossing = room.crossing(walkbox, next, next == dest_box, self.pos, self.walk.dest);
            match crossing {
                Ok(Crossing::Via { point2, point3 }) => {
                    self.walk.state = WalkState::InLeg;
                    if let Some(point2) = point2 {
                        if self.begin_leg(room, point2) {
                            self.walk.point3 = Some(point3);
                            return;
                        }
                    }
                    if self.begin_leg(room, point3) {
                        return;
                    }
                    self.set_box(room, Some(next));
                }
                Ok(Crossing::Direct) | Err(_) => return self.start_last_leg(room),
            }
        }

        warn!(actor = self.id.0, "walk resolution did not settle; stopping in the current box");
        match self.walkbox {
            Some(walkbox) => self.stop_early(room, walkbox),
            None => self.start_last_leg(room),
        }
    }

    fn blocked_by(&self, room: &Room, next: BoxId) -> bool {
        room.get_box(next)
            .map(|b| b.flags.blocks(self.is_player))
            .unwrap_or(true)
    }

    /// The destination cannot be reached: walk to the best point of the
    /// current box instead.
    fn stop_early(&mut self, room: &Room, walkbox: BoxId) {
        let dest = self.walk.dest;
        let target = match room.point_in_box(walkbox, dest) {
            Ok(true) => dest,
            Ok(false) => room
                .closest_point_on_box(walkbox, dest)
                .map(|(p, _)| p)
                .unwrap_or(self.pos),
            Err(_) => self.pos,
        };
        debug!(
            actor = self.id.0,
            walkbox = walkbox.0,
            x = target.x,
            y = target.y,
            "destination unreachable; stopping early"
        );

        self.walk.dest = target;
        self.walk.dest_box = Some(walkbox);
        self.walk.dest_dir = None;
        self.walk.cur_box = Some(walkbox);
        self.start_last_leg(room);
    }

    fn start_last_leg(&mut self, room: &Room) {
        self.walk.state = WalkState::LastLeg;
        self.walk.point3 = None;
        self.begin_leg(room, self.walk.dest);
    }

    /// Plan a leg toward `target` and take its first step. Returns whether the
    /// actor is still moving afterwards.
    pub(crate) fn begin_leg(&mut self, room: &Room, target: Point) -> bool {
        if self.pos == target {
            self.walk.leg = Leg::stationary(self.pos);
            return false;
        }
        self.walk.track = self.pos;
        self.walk.leg = self.policy.plan(self.pos, target, self.speed);
        self.target_facing = self.walk.leg.facing;
        debug!(
            actor = self.id.0,
            from_x = self.pos.x,
            from_y = self.pos.y,
            to_x = target.x,
            to_y = target.y,
            "leg started"
        );
        self.advance(room)
    }

    /// One tick of movement along the current leg.
    fn advance(&mut self, room: &Room) -> bool {
        self.facing = self.next_facing(room, true);
        let outcome = self.policy.step(&mut self.walk.leg, &mut self.walk.track, self.scale);
        self.pos = self.keep_in_box(room, self.walk.track);

        if let Some(cur_box) = self.walk.cur_box {
            if self.walkbox != Some(cur_box) && room.point_in_box(cur_box, self.pos).unwrap_or(false) {
                self.set_box(room, Some(cur_box));
            }
        }
        self.refresh_scale(room);

        outcome == StepOutcome::Moving
    }

    /// Fixed-point steps on a slanted edge can floor a pixel past it. Pull
    /// such points back onto the nearer of the walkbox and the box being
    /// entered, preferring the walkbox on ties.
    fn keep_in_box(&self, room: &Room, p: Point) -> Point {
        if self.ignore_boxes {
            return p;
        }
        let Some(walkbox) = self.walkbox else {
            return p;
        };
        let inside = |id: BoxId| room.point_in_box(id, p).unwrap_or(true);
        if inside(walkbox) || self.walk.cur_box.is_some_and(inside) {
            return p;
        }

        [Some(walkbox), self.walk.cur_box]
            .into_iter()
            .flatten()
            .filter_map(|id| room.closest_point_on_box(id, p).ok())
            .min_by_key(|(_, dist)| *dist)
            .map_or(p, |(q, _)| q)
    }

    fn finish_walk(&mut self) {
        match self.walk.dest_dir {
            Some(dir) if dir != self.facing => self.turn_to(dir),
            _ => self.walk.state = WalkState::Idle,
        }
    }

    fn turn_tick(&mut self, room: &Room) {
        let next = self.next_facing(room, false);
        if next != self.facing {
            self.facing = next;
        } else {
            self.walk.state = WalkState::Idle;
        }
    }

    pub(crate) fn turn_to(&mut self, dir: u16) {
        self.target_facing = facing::normalize(dir as i32);
        self.walk.state = WalkState::Turning;
    }

    fn next_facing(&self, room: &Room, walking: bool) -> u16 {
        let flags = self.box_flags(room);
        facing::next_facing(
            self.facing,
            self.target_facing,
            flags,
            walking,
            self.walk.leg.delta_x > 0,
            self.walk.leg.delta_y > 0,
        )
    }

    pub(crate) fn box_flags(&self, room: &Room) -> BoxFlags {
        if self.ignore_boxes {
            return BoxFlags::empty();
        }
        self.walkbox
            .and_then(|id| room.store().walkbox(id))
            .map(|b| b.flags)
            .unwrap_or_default()
    }

    pub(crate) fn set_box(&mut self, room: &Room, walkbox: Option<BoxId>) {
        self.walkbox = walkbox;
        self.refresh_scale(room);
    }

    pub(crate) fn refresh_scale(&mut self, room: &Room) {
        if self.ignore_boxes {
            return;
        }
        let Some(id) = self.walkbox else {
            return;
        };
        let Some(walkbox) = room.store().walkbox(id) else {
            return;
        };
        if walkbox.flags.contains(BoxFlags::IGNORE_SCALE) {
            return;
        }
        if let Ok(scale) = room.scale_at(id, self.pos) {
            self.scale = scale;
        }
    }
}
