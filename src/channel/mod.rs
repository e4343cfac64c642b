//! Thick-line traversal along a directed segment.
//!
//! A [`Channel`] walks the ideal Bresenham line from `p0` to `p1` and, at
//! each canonical point, produces the pixels of a perpendicular
//! cross-section. The cross-sections are disjoint — every raster pixel is
//! produced at most once over the whole walk — and together they cover a
//! thick line of width `2 * radius - 1`.
//!
//! Two scanner variants sit behind a tagged enum, selected once at
//! construction so the per-step work is a plain match:
//!
//! - an axial scanner for horizontal and vertical segments, where the
//!   cross-section is a straight pixel run;
//! - an oblique scanner for everything else, implementing the Murphy
//!   extension of Bresenham's algorithm with paired perpendicular comb
//!   passes.
//!
//! The major axis is whichever of |Δx|, |Δy| is larger; ties go to the
//! y-major branch.

mod axial;
mod oblique;


use crate::error::{Error, Result};
use crate::types::{Axis, Point};
use axial::AxialScanner;
use oblique::ObliqueScanner;
use std::collections::BTreeSet;

#[derive(Debug)]
enum Scanner {
    Axial(AxialScanner),
    Oblique(ObliqueScanner),
}

/// Iterator over (canonical point, cross-section) pairs from `p0` to `p1`
/// inclusive.
#[derive(Debug)]
pub struct Channel {
    canonical: Point,
    remaining: usize,
    scanner: Scanner,
}

impl Channel {
    /// Set up a walk from `p0` to `p1` with the given half-width.
    ///
    /// `radius` counts the reference pixel: a radius of 3 yields
    /// cross-sections five pixels wide. Coincident endpoints are refused
    /// with [`Error::InvalidSegment`].
    pub fn new(p0: Point, p1: Point, radius: i64) -> Result<Self> {
        if p0 == p1 {
            return Err(Error::InvalidSegment(p0));
        }

        let delta = p1 - p0;
        let scanner = if delta.x.abs() > delta.y.abs() {
            if delta.y == 0 {
                Scanner::Axial(AxialScanner::new(Axis::X, delta, radius))
            } else {
                Scanner::Oblique(ObliqueScanner::new(Axis::X, delta, radius))
            }
        } else if delta.x == 0 {
            Scanner::Axial(AxialScanner::new(Axis::Y, delta, radius))
        } else {
            Scanner::Oblique(ObliqueScanner::new(Axis::Y, delta, radius))
        };

        Ok(Self {
            canonical: p0,
            remaining: delta.x.abs().max(delta.y.abs()) as usize + 1,
            scanner,
        })
    }
}

impl Iterator for Channel {
    type Item = (Point, Vec<Point>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let canonical = self.canonical;
        let mut pixels = BTreeSet::new();
        match &self.scanner {
            Scanner::Axial(s) => s.fill(canonical, &mut pixels),
            Scanner::Oblique(s) => s.fill(canonical, &mut pixels),
        }
        // A degenerate width can leave the section empty; the canonical
        // point stands in so the walk always covers the ideal line.
        if pixels.is_empty() {
            pixels.insert(canonical);
        }

        if self.remaining > 0 {
            match &mut self.scanner {
                Scanner::Axial(s) => s.advance(&mut self.canonical),
                Scanner::Oblique(s) => s.advance(&mut self.canonical),
            }
        }

        Some((canonical, pixels.into_iter().collect()))
    }
}
