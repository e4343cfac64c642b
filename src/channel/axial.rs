//! Scanner for horizontal and vertical segments.

use crate::types::{Axis, Point};
use std::collections::BTreeSet;

/// Degenerate channel walker for segments parallel to an axis.
///
/// The canonical point moves one pixel per step along the major axis and the
/// cross-section is a straight run of `2 * radius - 1` pixels across it.
#[derive(Debug)]
pub(super) struct AxialScanner {
    major: Axis,
    step: i64,
    radius: i64,
}

impl AxialScanner {
    pub(super) fn new(major: Axis, delta: Point, radius: i64) -> Self {
        Self {
            major,
            step: major.of(delta).signum(),
            radius,
        }
    }

    pub(super) fn fill(&self, pt: Point, pixels: &mut BTreeSet<Point>) {
        let minor = self.major.other();
        let mut p = pt;
        *minor.of_mut(&mut p) -= self.radius;

        for _ in 1..2 * self.radius {
            *minor.of_mut(&mut p) += 1;
            pixels.insert(p);
        }
    }

    pub(super) fn advance(&mut self, pt: &mut Point) {
        *self.major.of_mut(pt) += self.step;
    }
}
