//! Pixel collection for a single connected run along a scan channel.

use crate::accumulator::Accumulator;
use crate::error::{Error, Result};
use crate::state::State;
use crate::types::{Point, Segment, Status};
use std::collections::BTreeSet;

/// The pixels and endpoints of one run found by a scan.
///
/// The run's segment is anchored on canonical channel points: the head is
/// fixed by the first step that produced hits and the tail advances with
/// every further one. The pixel set collects the cross-section hits around
/// those steps; the segment need not pass through every collected pixel.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    points: BTreeSet<Point>,
    segment: Option<Segment>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the run by one channel step.
    ///
    /// `canonical` advances the segment tail (and sets the head on the
    /// first call); `hits` are merged into the pixel set, ignoring
    /// duplicates. The canonical point itself is not added to the set.
    pub fn add_point<I>(&mut self, canonical: Point, hits: I)
    where
        I: IntoIterator<Item = Point>,
    {
        match &mut self.segment {
            None => self.segment = Some(Segment::new(canonical, canonical)),
            Some(segment) => segment.b = canonical,
        }
        self.points.extend(hits);
    }

    /// The run's segment, if any step has been recorded.
    pub fn segment(&self) -> Option<Segment> {
        self.segment
    }

    /// Number of distinct pixels collected.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The collected pixels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Squared length of the run's segment; zero when the set is empty, so
    /// an empty set never outranks a real one.
    pub fn length_squared(&self) -> i64 {
        match self.segment {
            Some(segment) => segment.length_squared(),
            None => 0,
        }
    }

    /// Fold the run into an accepted segment.
    ///
    /// Voted pixels withdraw their accumulator votes before retiring;
    /// pending pixels retire directly. Pixels are visited in the set's
    /// ascending order, so the update sequence is deterministic. Any other
    /// status is an [`Error::InvariantViolation`], reported without
    /// unwinding the updates already applied.
    pub fn commit(self, state: &mut State, accumulator: &mut Accumulator) -> Result<()> {
        for p in self.points {
            match state.status(p) {
                Status::Voted => {
                    accumulator.unvote(p)?;
                    state.mark_done(p)?;
                }
                Status::Pending => state.mark_done(p)?,
                other => {
                    return Err(Error::InvariantViolation {
                        point: p,
                        detail: format!("{other} pixel in a committed run"),
                    })
                }
            }
        }
        Ok(())
    }
}
