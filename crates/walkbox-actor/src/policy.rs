//! Per-tick walk arithmetic. Each policy plans a straight leg toward a
//! waypoint and then advances the actor along it one tick at a time.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use walkbox_nav::{Point, FULL_SCALE};

use crate::facing::{leg_facing, quadrant_angle};

/// Walk speed in pixels per tick along each axis, at full scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WalkSpeed {
    pub x: u16,
    pub y: u16,
}

impl WalkSpeed {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn is_valid(self) -> bool {
        self.x > 0 && self.y > 0
    }
}

impl Default for WalkSpeed {
    fn default() -> Self {
        Self { x: 8, y: 2 }
    }
}

/// State of one straight leg between two points.
///
/// `delta_x`/`delta_y` are 16.16 fixed-point velocities for the stepping
/// policies and whole-pixel step sizes for [`LegacyCounter`]; the counter
/// fields are only used by the latter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Leg {
    pub cur: Point,
    pub next: Point,
    pub delta_x: i32,
    pub delta_y: i32,
    pub xfrac: u16,
    pub yfrac: u16,
    pub x_count: i32,
    pub y_count: i32,
    pub x_add: i32,
    pub y_add: i32,
    pub threshold: i32,
    /// Facing implied by the leg direction.
    pub facing: u16,
}

impl Leg {
    /// A leg that has already arrived at `at`.
    pub fn stationary(at: Point) -> Self {
        Self {
            cur: at,
            next: at,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moving,
    Arrived,
}

/// Which walk arithmetic an actor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PolicyKind {
    #[default]
    ScaledStep,
    RectangularSpeed,
    LegacyCounter,
}

impl PolicyKind {
    pub fn policy(self) -> Box<dyn WalkPolicy> {
        match self {
            PolicyKind::ScaledStep => Box::new(ScaledStep),
            PolicyKind::RectangularSpeed => Box::new(RectangularSpeed),
            PolicyKind::LegacyCounter => Box::new(LegacyCounter),
        }
    }
}

pub trait WalkPolicy: fmt::Debug + Send + Sync {
    fn kind(&self) -> PolicyKind;

    /// Plan a leg from `from` to `to`. `from != to`.
    fn plan(&self, from: Point, to: Point, speed: WalkSpeed) -> Leg;

    /// Advance `pos` by one tick along `leg`.
    fn step(&self, leg: &mut Leg, pos: &mut Point, scale: u8) -> StepOutcome;
}

/// Fixed-point stepping whose per-tick distance scales with the actor's scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaledStep;

/// [`ScaledStep`] arithmetic at full scale regardless of the box.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectangularSpeed;

/// Integer step counters with per-axis step sizes; ignores scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyCounter;

fn plan_fixed(from: Point, to: Point, speed: WalkSpeed) -> Leg {
    let diff_x = to.x as i64 - from.x as i64;
    let diff_y = to.y as i64 - from.y as i64;

    let mut delta_y = (speed.y as i64) << 16;
    if diff_y < 0 {
        delta_y = -delta_y;
    }
    let mut delta_x = delta_y * diff_x;
    if diff_y != 0 {
        delta_x /= diff_y;
    } else {
        delta_y = 0;
    }

    if (delta_x / 0x10000).abs() > speed.x as i64 {
        delta_x = (speed.x as i64) << 16;
        if diff_x < 0 {
            delta_x = -delta_x;
        }
        delta_y = delta_x * diff_y;
        if diff_x != 0 {
            delta_y /= diff_x;
        } else {
            delta_x = 0;
        }
    }

    Leg {
        cur: from,
        next: to,
        delta_x: delta_x as i32,
        delta_y: delta_y as i32,
        facing: leg_facing(diff_x as i32, diff_y as i32, delta_y > 0, delta_x > 0),
        ..Leg::default()
    }
}

fn step_fixed(leg: &mut Leg, pos: &mut Point, scale: u8) -> StepOutcome {
    let dist_x = (leg.next.x - leg.cur.x).abs();
    let dist_y = (leg.next.y - leg.cur.y).abs();

    if (pos.x - leg.cur.x).abs() >= dist_x && (pos.y - leg.cur.y).abs() >= dist_y {
        return StepOutcome::Arrived;
    }

    let scale = scale.max(1) as i64;
    let inc_x = (leg.delta_x >> 8) as i64 * scale;
    let inc_y = (leg.delta_y >> 8) as i64 * scale;

    let tmp_x = ((pos.x as i64) << 16) + leg.xfrac as i64 + inc_x;
    leg.xfrac = tmp_x as u16;
    pos.x = (tmp_x >> 16) as i32;

    let tmp_y = ((pos.y as i64) << 16) + leg.yfrac as i64 + inc_y;
    leg.yfrac = tmp_y as u16;
    pos.y = (tmp_y >> 16) as i32;

    if (pos.x - leg.cur.x).abs() > dist_x {
        pos.x = leg.next.x;
    }
    if (pos.y - leg.cur.y).abs() > dist_y {
        pos.y = leg.next.y;
    }

    // Steep legs can leave the minor axis with a zero increment.
    if inc_x == 0 && pos.y == leg.next.y {
        pos.x = leg.next.x;
    }
    if inc_y == 0 && pos.x == leg.next.x {
        pos.y = leg.next.y;
    }

    if *pos == leg.next {
        StepOutcome::Arrived
    } else {
        StepOutcome::Moving
    }
}

impl WalkPolicy for ScaledStep {
    fn kind(&self) -> PolicyKind {
        PolicyKind::ScaledStep
    }

    fn plan(&self, from: Point, to: Point, speed: WalkSpeed) -> Leg {
        plan_fixed(from, to, speed)
    }

    fn step(&self, leg: &mut Leg, pos: &mut Point, scale: u8) -> StepOutcome {
        step_fixed(leg, pos, scale)
    }
}

impl WalkPolicy for RectangularSpeed {
    fn kind(&self) -> PolicyKind {
        PolicyKind::RectangularSpeed
    }

    fn plan(&self, from: Point, to: Point, speed: WalkSpeed) -> Leg {
        plan_fixed(from, to, speed)
    }

    fn step(&self, leg: &mut Leg, pos: &mut Point, _scale: u8) -> StepOutcome {
        step_fixed(leg, pos, FULL_SCALE)
    }
}

impl WalkPolicy for LegacyCounter {
    fn kind(&self) -> PolicyKind {
        PolicyKind::LegacyCounter
    }

    fn plan(&self, from: Point, to: Point, speed: WalkSpeed) -> Leg {
        let diff_x = to.x - from.x;
        let diff_y = to.y - from.y;
        let speed_x = speed.x.max(1) as i32;
        let speed_y = speed.y.max(1) as i32;

        // Mostly-vertical legs take short x steps so both axes finish together.
        let step_x = if ((diff_y.abs() / speed_y) >> 1) > diff_x.abs() / speed_x {
            speed_y + 1
        } else {
            speed_x
        };
        let threshold = (diff_y.abs() / speed_y).max(diff_x.abs() / step_x);

        let delta_x = if diff_x < 0 { -step_x } else { step_x };
        let delta_y = if diff_y < 0 { -speed_y } else { speed_y };
        let x_add = diff_x / delta_x;
        let y_add = diff_y / delta_y;

        let facing = if diff_y.abs() * 3 > diff_x.abs() {
            quadrant_angle(if diff_y >= 0 { 2 } else { 3 })
        } else {
            quadrant_angle(if diff_x >= 0 { 1 } else { 0 })
        };

        Leg {
            cur: from,
            next: to,
            delta_x,
            delta_y,
            x_count: x_add,
            y_count: y_add,
            x_add,
            y_add,
            threshold,
            facing,
            ..Leg::default()
        }
    }

    fn step(&self, leg: &mut Leg, pos: &mut Point, _scale: u8) -> StepOutcome {
        let step_x = leg.delta_x.abs();
        let step_y = leg.delta_y.abs();

        if leg.next.x - step_x <= pos.x && pos.x <= leg.next.x + step_x {
            pos.x = leg.next.x;
        }
        if leg.next.y - step_y <= pos.y && pos.y <= leg.next.y + step_y {
            pos.y = leg.next.y;
        }
        if *pos == leg.next {
            return StepOutcome::Arrived;
        }

        leg.x_count += leg.x_add;
        if leg.x_count >= leg.threshold {
            if pos.x != leg.next.x {
                pos.x += leg.delta_x;
            }
            leg.x_count -= leg.threshold;
        }
        leg.y_count += leg.y_add;
        if leg.y_count >= leg.threshold {
            if pos.y != leg.next.y {
                pos.y += leg.delta_y;
            }
            leg.y_count -= leg.threshold;
        }

        StepOutcome::Moving
    }
}
