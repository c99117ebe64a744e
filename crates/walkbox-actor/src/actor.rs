#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use walkbox_nav::{AdjustedPoint, BoxId, Point, Room, FULL_SCALE};

use crate::config::WalkConfig;
use crate::facing;
use crate::policy::{Leg, WalkPolicy, WalkSpeed};
use crate::walk::{WalkData, WalkState, WalkStatus};
use crate::WalkError;

/// Stable actor identifier; actors tick in ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActorId(pub u16);

/// What rendering needs from an actor each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActorView {
    pub id: ActorId,
    pub pos: Point,
    pub facing: u16,
    pub scale: u8,
    pub walkbox: Option<BoxId>,
}

/// A walking actor: position, facing and scale plus the walk in progress.
///
/// Actors borrow the room immutably for every call that needs geometry, so
/// any number of them can share one compiled room.
#[derive(Debug)]
pub struct Actor {
    pub(crate) id: ActorId,
    pub(crate) is_player: bool,
    pub(crate) pos: Point,
    pub(crate) facing: u16,
    pub(crate) target_facing: u16,
    pub(crate) walkbox: Option<BoxId>,
    pub(crate) scale: u8,
    pub(crate) speed: WalkSpeed,
    pub(crate) ignore_boxes: bool,
    pub(crate) policy: Box<dyn WalkPolicy>,
    pub(crate) config: WalkConfig,
    pub(crate) walk: WalkData,
}

impl Actor {
    pub fn new(id: ActorId) -> Self {
        Self::with_config(id, WalkConfig::default())
    }

    pub fn with_config(id: ActorId, config: WalkConfig) -> Self {
        Self {
            id,
            is_player: false,
            pos: Point::ZERO,
            facing: facing::TOWARD,
            target_facing: facing::TOWARD,
            walkbox: None,
            scale: FULL_SCALE,
            speed: config.speed,
            ignore_boxes: false,
            policy: config.policy.policy(),
            config,
            walk: WalkData::default(),
        }
    }

    /// Replace the walk arithmetic.
    pub fn with_policy(mut self, policy: Box<dyn WalkPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn player(mut self) -> Self {
        self.is_player = true;
        self
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn is_player(&self) -> bool {
        self.is_player
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Position in 16.16 fixed point, including the sub-pixel walk fractions.
    pub fn fixed_position(&self) -> (i64, i64) {
        (
            ((self.pos.x as i64) << 16) + self.walk.leg.xfrac as i64,
            ((self.pos.y as i64) << 16) + self.walk.leg.yfrac as i64,
        )
    }

    pub fn facing(&self) -> u16 {
        self.facing
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn speed(&self) -> WalkSpeed {
        self.speed
    }

    pub fn walkbox(&self) -> Option<BoxId> {
        self.walkbox
    }

    pub fn ignores_boxes(&self) -> bool {
        self.ignore_boxes
    }

    pub fn policy(&self) -> &dyn WalkPolicy {
        self.policy.as_ref()
    }

    pub fn state(&self) -> WalkState {
        self.walk.state
    }

    pub fn is_walking(&self) -> bool {
        self.walk.state.is_walking()
    }

    /// Destination of the walk in progress (after clamping into a box).
    pub fn destination(&self) -> Option<Point> {
        self.is_walking().then_some(self.walk.dest)
    }

    /// End point of the leg currently being walked.
    pub fn waypoint(&self) -> Option<Point> {
        matches!(self.walk.state, WalkState::InLeg | WalkState::LastLeg).then_some(self.walk.leg.next)
    }

    pub fn view(&self) -> ActorView {
        ActorView {
            id: self.id,
            pos: self.pos,
            facing: self.facing,
            scale: self.scale,
            walkbox: self.walkbox,
        }
    }

    /// Advance the actor by one simulation tick.
    pub fn tick(&mut self, room: &Room) -> WalkStatus {
        self.run_walk(room);
        self.walk.state.into()
    }

    /// Walk to `dest`, optionally turning to `dir` on arrival.
    ///
    /// Unless boxes are ignored the destination is clamped into the room's
    /// walkable area first. Re-issuing the walk in progress, or asking to walk
    /// to the spot and facing the actor already has, changes nothing.
    pub fn set_destination(&mut self, room: &Room, dest: Point, dir: Option<u16>) {
        let dest = dest.clamp_to_room();
        let dir = dir.map(|d| facing::normalize(d as i32));

        let (dest, dest_box) = if self.ignore_boxes {
            self.walkbox = None;
            (dest, None)
        } else {
            let in_dest_box = self
                .walk
                .dest_box
                .is_some_and(|b| room.point_in_box(b, dest).unwrap_or(false));
            let target = if in_dest_box {
                (dest, self.walk.dest_box)
            } else {
                let adjusted = self.adjust_into_box(room, dest);
                (adjusted.point, adjusted.walkbox)
            };
            if self.is_walking() && self.walk.dest_dir == dir && self.walk.dest == target.0 {
                return;
            }
            target
        };

        if self.pos == dest {
            if let Some(dir) = dir {
                if dir != self.facing {
                    self.turn_to(dir);
                }
            }
            return;
        }

        self.walk.dest = dest;
        self.walk.dest_box = dest_box;
        self.walk.dest_dir = dir;
        self.walk.point3 = None;
        self.walk.cur_box = self.walkbox;
        self.walk.state = WalkState::NewLeg;
    }

    /// Place the actor at `pos`, clamped into the nearest valid box, ending
    /// any walk. A facing lock on the new box is applied on the next tick.
    pub fn put_actor(&mut self, room: &Room, pos: Point) {
        let adjusted = self.adjust_into_box(room, pos.clamp_to_room());

        self.pos = adjusted.point;
        self.walk = WalkData {
            dest: adjusted.point,
            track: adjusted.point,
            dest_box: adjusted.walkbox,
            cur_box: adjusted.walkbox,
            leg: Leg::stationary(adjusted.point),
            ..WalkData::default()
        };
        self.set_box(room, adjusted.walkbox);

        if self.box_flags(room).direction_lock() != 0 {
            self.turn_to(self.facing);
        }
    }

    /// Stop walking where the actor stands. Safe to call at any time.
    pub fn stop_walking(&mut self) {
        self.walk.state = WalkState::Idle;
        self.walk.point3 = None;
        self.walk.dest_dir = None;
        self.walk.dest = self.pos;
    }

    /// Turn in place toward `dir`, cancelling any walk.
    pub fn turn_to_direction(&mut self, dir: u16) {
        self.walk.point3 = None;
        self.turn_to(dir);
    }

    /// Change walk speed; a leg in progress is re-planned from the current position.
    pub fn set_walk_speed(&mut self, speed: WalkSpeed) -> Result<(), WalkError> {
        if !speed.is_valid() {
            return Err(WalkError::InvalidSpeed {
                x: speed.x,
                y: speed.y,
            });
        }
        if speed == self.speed {
            return Ok(());
        }
        self.speed = speed;

        let in_leg = matches!(self.walk.state, WalkState::InLeg | WalkState::LastLeg);
        let next = self.walk.leg.next;
        if in_leg && next != self.pos {
            self.walk.track = self.pos;
            self.walk.leg = self.policy.plan(self.pos, next, speed);
            self.target_facing = self.walk.leg.facing;
        }
        Ok(())
    }

    /// Toggle box constraints and re-place the actor under the new rule.
    pub fn set_ignore_boxes(&mut self, room: &Room, ignore: bool) {
        self.ignore_boxes = ignore;
        self.put_actor(room, self.pos);
    }

    fn adjust_into_box(&self, room: &Room, p: Point) -> AdjustedPoint {
        if self.ignore_boxes {
            return AdjustedPoint {
                point: p,
                walkbox: None,
            };
        }
        room.find_closest_box_and_point(p, self.config.scan_order, self.is_player)
    }
}
