//! Murphy thick-line scanner for sloped segments.
//!
//! Bresenham's midpoint walk decides when the canonical point takes a minor
//! step; Murphy's extension reuses the same error bookkeeping to draw the
//! perpendicular cross-section as two comb passes, one to each side of the
//! ideal line. A running thickness counter `tk` bounds each pass against the
//! virtual width `2 * radius * √(Δx² + Δy²)`, which keeps the drawn width at
//! `2 * radius - 1` pixels on average regardless of slope.
//!
//! See <http://kt8216.unixcab.org/murphy/index.html> for the original
//! derivation of the constants.

use crate::types::{Axis, Point};
use std::collections::BTreeSet;

#[derive(Debug)]
pub(super) struct ObliqueScanner {
    major: Axis,
    /// Componentwise magnitudes of the segment delta.
    delta: Point,
    /// Componentwise signs of the segment delta.
    step: Point,
    /// Direction of the perpendicular comb passes.
    perp_step: Point,
    /// Virtual width bound for the thickness counter.
    width: f64,
    /// Error level at which a minor step is due: `D - 2d`.
    threshold: i64,
    /// Error adjustment after a minor step: `-2D`.
    post_minor_move: i64,
    /// Error adjustment after a major step: `2d`.
    post_major_move: i64,
    /// Bresenham error for the canonical walk.
    error: i64,
    /// Bresenham error for the perpendicular placement.
    phase: i64,
}

impl ObliqueScanner {
    pub(super) fn new(major: Axis, delta: Point, radius: i64) -> Self {
        let magnitude = Point::new(delta.x.abs(), delta.y.abs());
        let step = Point::new(delta.x.signum(), delta.y.signum());
        let perp_step = match major {
            Axis::X => Point::new(-step.x, step.y),
            Axis::Y => Point::new(step.x, -step.y),
        };

        let d_major = major.of(magnitude);
        let d_minor = major.other().of(magnitude);

        Self {
            major,
            delta: magnitude,
            step,
            perp_step,
            width: 2.0 * radius as f64 * (magnitude.x as f64).hypot(magnitude.y as f64),
            threshold: d_major - 2 * d_minor,
            post_minor_move: -2 * d_major,
            post_major_move: 2 * d_minor,
            error: 0,
            phase: 0,
        }
    }

    /// Emit the two comb passes around `pt` into `pixels`.
    ///
    /// Each pass walks minor steps away from the canonical point, applying a
    /// major-axis correction whenever its own Bresenham phase crosses the
    /// threshold, and stops once the accumulated thickness exceeds the
    /// virtual width.
    fn perpendiculars(
        &self,
        pt: Point,
        pixels: &mut BTreeSet<Point>,
        initial_phase: i64,
        initial_error: i64,
    ) {
        let major = self.major;
        let minor = major.other();
        let d = major.of(self.delta) + minor.of(self.delta);

        let mut p = pt;
        let mut phase = initial_phase;
        let mut tk = d - initial_error;

        while (tk as f64) < self.width {
            pixels.insert(p);

            if phase >= self.threshold {
                *major.of_mut(&mut p) += major.of(self.perp_step);
                phase += self.post_minor_move;
                tk += self.post_major_move;
            }
            *minor.of_mut(&mut p) += minor.of(self.perp_step);
            phase += self.post_major_move;
            tk -= self.post_minor_move;
        }

        let mut p = pt;
        let mut phase = -initial_phase;
        let mut tk = d + initial_error;

        while tk as f64 <= self.width {
            pixels.insert(p);

            if phase > self.threshold {
                *major.of_mut(&mut p) -= major.of(self.perp_step);
                phase += self.post_minor_move;
                tk += self.post_major_move;
            }
            *minor.of_mut(&mut p) -= minor.of(self.perp_step);
            phase += self.post_major_move;
            tk -= self.post_minor_move;
        }
    }

    pub(super) fn fill(&self, pt: Point, pixels: &mut BTreeSet<Point>) {
        self.perpendiculars(pt, pixels, self.phase, self.error);

        // When the upcoming advance will take a minor step, a second fan
        // from the stepped position plugs the elbow the turn would leave
        // uncovered.
        if self.error >= self.threshold && self.phase >= self.threshold {
            let minor = self.major.other();
            let mut stepped = pt;
            *minor.of_mut(&mut stepped) += minor.of(self.step);
            self.perpendiculars(
                stepped,
                pixels,
                self.phase + self.post_minor_move + self.post_major_move,
                self.error + self.post_minor_move,
            );
        }
    }

    pub(super) fn advance(&mut self, pt: &mut Point) {
        let minor = self.major.other();

        if self.error >= self.threshold {
            *minor.of_mut(pt) += minor.of(self.step);
            self.error += self.post_minor_move;

            if self.phase >= self.threshold {
                self.phase += self.post_minor_move;
            }
            self.phase += self.post_major_move;
        }

        *self.major.of_mut(pt) += self.major.of(self.step);
        self.error += self.post_major_move;
    }
}
