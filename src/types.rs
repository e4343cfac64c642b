//! Core value types shared by every stage of the detector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// A pixel location or integer displacement on the raster.
///
/// The ordering is lexicographic (`x` first), which makes ordered sets of
/// points well-defined for endpoint deduplication.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Inner product of two points treated as vectors.
    #[inline]
    pub fn dot(self, other: Point) -> i64 {
        self.x * other.x + self.y * other.y
    }

    /// Squared Euclidean length of the point treated as a vector.
    #[inline]
    pub fn length_squared(self) -> i64 {
        self.dot(self)
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

impl Mul for Point {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        Point::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div for Point {
    type Output = Point;

    fn div(self, rhs: Point) -> Point {
        Point::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl Mul<i64> for Point {
    type Output = Point;

    fn mul(self, rhs: i64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<i64> for Point {
    type Output = Point;

    fn div(self, rhs: i64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Selector for one coordinate of a [`Point`].
///
/// The channel scanners and the k-d search both alternate between axes; a
/// small enum keeps that switch out of the per-pixel code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub(crate) fn of(self, p: Point) -> i64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    #[inline]
    pub(crate) fn of_mut(self, p: &mut Point) -> &mut i64 {
        match self {
            Axis::X => &mut p.x,
            Axis::Y => &mut p.y,
        }
    }

    #[inline]
    pub(crate) fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// An unordered pair of endpoints.
///
/// Two segments are equal when their endpoints match as a multiset,
/// regardless of orientation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Squared Euclidean distance between the endpoints.
    #[inline]
    pub fn length_squared(self) -> i64 {
        (self.b - self.a).length_squared()
    }

    /// The same segment with its endpoints exchanged.
    pub fn reversed(self) -> Segment {
        Segment::new(self.b, self.a)
    }

    /// Endpoints rearranged into lexicographic order, for use as a sort or
    /// hash key.
    pub fn normalized(self) -> Segment {
        if self.b < self.a {
            self.reversed()
        } else {
            self
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Segment) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl Eq for Segment {}

impl std::hash::Hash for Segment {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        let norm = self.normalized();
        norm.a.hash(state);
        norm.b.hash(state);
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--{}", self.a, self.b)
    }
}

/// A line in Hough space: `theta` in integer parts of a semiturn, `rho` in
/// raw pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub theta: usize,
    pub rho: f64,
}

impl Line {
    pub const fn new(theta: usize, rho: f64) -> Self {
        Self { theta, rho }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(θ = {}, ρ = {})", self.theta, self.rho)
    }
}

/// Lifecycle of a pixel in the [`crate::state::State`] raster.
///
/// Pixels only move forward: `Unset → Pending → Voted → Done`, with
/// `Pending → Done` allowed when a scan commits a pixel that never voted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Status {
    /// Pixel is not set in the source bitmap.
    #[default]
    Unset,
    /// Pixel is set but has not voted yet.
    Pending,
    /// Pixel is set and its votes are in the accumulator.
    Voted,
    /// Pixel has been incorporated into a segment.
    Done,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Unset => "unset",
            Status::Pending => "pending",
            Status::Voted => "voted",
            Status::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let p = Point::new(3, -4);
        let q = Point::new(1, 2);
        assert_eq!(p + q, Point::new(4, -2));
        assert_eq!(p - q, Point::new(2, -6));
        assert_eq!(p * q, Point::new(3, -8));
        assert_eq!(p * 2, Point::new(6, -8));
        assert_eq!(p / 1, p);
        assert_eq!(p.dot(q), -5);
        assert_eq!(p.length_squared(), 25);
    }

    #[test]
    fn point_order_is_lexicographic() {
        assert!(Point::new(0, 9) < Point::new(1, 0));
        assert!(Point::new(1, 0) < Point::new(1, 1));
        assert_eq!(
            Point::new(2, 2).cmp(&Point::new(2, 2)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn segment_equality_ignores_orientation() {
        let s = Segment::new(Point::new(0, 0), Point::new(5, 5));
        assert_eq!(s, s.reversed());
        assert_ne!(s, Segment::new(Point::new(0, 0), Point::new(5, 4)));
    }

    #[test]
    fn status_starts_unset() {
        assert_eq!(Status::default(), Status::Unset);
    }
}
