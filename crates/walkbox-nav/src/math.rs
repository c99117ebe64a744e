use core::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Squared distances saturate here once either axis delta reaches [`FAR_AXIS_DELTA`].
pub const FAR_DISTANCE: u32 = 0x00FF_FFFF;

/// Axis delta at which [`Point::sqr_dist`] stops computing and returns [`FAR_DISTANCE`].
pub const FAR_AXIS_DELTA: i32 = 0x1000;

/// Room coordinates are stored as 16-bit values.
pub const ROOM_COORD_MIN: i32 = i16::MIN as i32;
pub const ROOM_COORD_MAX: i32 = i16::MAX as i32;

/// Integer room coordinate (pixels, y grows downwards).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp both axes into the 16-bit room coordinate range.
    pub fn clamp_to_room(self) -> Self {
        Self {
            x: self.x.clamp(ROOM_COORD_MIN, ROOM_COORD_MAX),
            y: self.y.clamp(ROOM_COORD_MIN, ROOM_COORD_MAX),
        }
    }

    /// Squared euclidean distance, saturating at [`FAR_DISTANCE`] for far points.
    ///
    /// The cap keeps the metric cheap and bounded; distant boxes all compare equal.
    pub fn sqr_dist(self, other: Point) -> u32 {
        let dx = (other.x as i64 - self.x as i64).abs();
        if dx >= FAR_AXIS_DELTA as i64 {
            return FAR_DISTANCE;
        }
        let dy = (other.y as i64 - self.y as i64).abs();
        if dy >= FAR_AXIS_DELTA as i64 {
            return FAR_DISTANCE;
        }
        (dx * dx + dy * dy) as u32
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// The four corners of a walkbox, in `ul, ur, lr, ll` order.
///
/// Corners are expected to wind clockwise on screen (y down). Two corners may
/// coincide, in which case the box degenerates to a line segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxCoords {
    pub ul: Point,
    pub ur: Point,
    pub lr: Point,
    pub ll: Point,
}

impl BoxCoords {
    pub const fn new(ul: Point, ur: Point, lr: Point, ll: Point) -> Self {
        Self { ul, ur, lr, ll }
    }

    /// Axis-aligned rectangle spanning `(x0, y0)` to `(x1, y1)`.
    pub const fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            ul: Point::new(x0, y0),
            ur: Point::new(x1, y0),
            lr: Point::new(x1, y1),
            ll: Point::new(x0, y1),
        }
    }

    /// Degenerate box covering the segment `a -> b`.
    pub const fn line(a: Point, b: Point) -> Self {
        Self {
            ul: a,
            ur: a,
            lr: b,
            ll: b,
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        [self.ul, self.ur, self.lr, self.ll]
    }

    /// Edges in winding order: top, right, bottom, left.
    pub fn edges(&self) -> [(Point, Point); 4] {
        [
            (self.ul, self.ur),
            (self.ur, self.lr),
            (self.lr, self.ll),
            (self.ll, self.ul),
        ]
    }

    /// Shift the corner list by one (`ur` becomes `ul`, and so on).
    pub fn rotated(self) -> Self {
        Self {
            ul: self.ur,
            ur: self.lr,
            lr: self.ll,
            ll: self.ul,
        }
    }

    /// True when the box collapses to a line segment (a ramp or stair edge).
    pub fn is_line(&self) -> bool {
        (self.ul == self.ur && self.lr == self.ll) || (self.ul == self.ll && self.ur == self.lr)
    }
}
