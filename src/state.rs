//! Pixel status map and the sampling machinery built on it.
//!
//! The state owns three things: the per-pixel [`Status`] raster, the queue
//! of pending pixels from which the driver draws uniformly at random, and
//! the seeded generator behind that draw. It also hosts the two geometric
//! services the driver needs per candidate line: clipping the infinite line
//! to the image rectangle and scanning the clipped segment for connected
//! runs of set pixels.

use crate::channel::Channel;
use crate::error::{Error, Result};
use crate::point_set::PointSet;
use crate::raster::Raster;
use crate::trig::TrigTable;
use crate::types::{Line, Point, Segment, Status};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// The mutable per-run state of the detector.
pub struct State {
    raster: Raster<Status>,
    pending: Vec<Point>,
    trig: TrigTable,
    rng: StdRng,
}

impl State {
    /// Create a state for a `rows × cols` image with every pixel unset.
    pub fn new(rows: usize, cols: usize, seed: u64) -> Self {
        Self::from_raster(Raster::new(rows, cols), seed)
    }

    /// Adopt an existing status raster.
    ///
    /// The pending queue is loaded with every pixel already marked
    /// [`Status::Pending`] in the raster, in row-major order.
    pub fn from_raster(raster: Raster<Status>, seed: u64) -> Self {
        let mut pending = Vec::new();
        for y in 0..raster.rows() {
            let row = &raster[y];
            for x in 0..raster.cols() {
                if row[x] == Status::Pending {
                    pending.push(Point::new(x as i64, y as i64));
                }
            }
        }

        Self {
            raster,
            pending,
            trig: TrigTable::semiturn(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Height of the image.
    pub fn rows(&self) -> usize {
        self.raster.rows()
    }

    /// Width of the image.
    pub fn cols(&self) -> usize {
        self.raster.cols()
    }

    /// Status of the pixel at `p`; out-of-range points read as unset.
    pub fn status(&self, p: Point) -> Status {
        if p.x < 0 || p.y < 0 || p.x >= self.cols() as i64 || p.y >= self.rows() as i64 {
            return Status::Unset;
        }
        self.raster[p.y as usize][p.x as usize]
    }

    /// Mark a set pixel of the source bitmap and queue it for sampling.
    ///
    /// Only unset pixels may become pending.
    pub fn mark_pending(&mut self, p: Point) {
        debug_assert_eq!(self.status(p), Status::Unset, "pixel {p} marked twice");
        self.raster[p.y as usize][p.x as usize] = Status::Pending;
        self.pending.push(p);
    }

    /// Retire a pixel into a committed segment.
    ///
    /// Only pending or voted pixels can be retired; anything else means the
    /// caller's bookkeeping has diverged from the raster.
    pub fn mark_done(&mut self, p: Point) -> Result<()> {
        match self.status(p) {
            Status::Pending | Status::Voted => {
                self.raster[p.y as usize][p.x as usize] = Status::Done;
                Ok(())
            }
            other => Err(Error::InvariantViolation {
                point: p,
                detail: format!("cannot mark {other} pixel done"),
            }),
        }
    }

    /// Draw a uniformly random pending pixel and mark it voted.
    ///
    /// Entries whose status changed since they were queued are stripped
    /// lazily before the draw. Returns `None` once no pending pixels
    /// remain; each pixel is returned at most once because the draw itself
    /// advances its status.
    pub fn next(&mut self) -> Option<Point> {
        let raster = &self.raster;
        self.pending
            .retain(|p| raster[p.y as usize][p.x as usize] == Status::Pending);

        if self.pending.is_empty() {
            return None;
        }

        let index = self.rng.random_range(0..self.pending.len());
        let p = self.pending.swap_remove(index);
        self.raster[p.y as usize][p.x as usize] = Status::Voted;
        Some(p)
    }

    /// Clip an infinite line to the image rectangle.
    ///
    /// The four axis-edge intersections are computed and the in-range ones
    /// collected into an ordered set, which absorbs degenerate duplicates
    /// such as a line through a corner. The segment spans the least and
    /// greatest surviving points; a single survivor yields a zero-length
    /// segment.
    pub fn line_intersect(&self, line: Line) -> Result<Segment> {
        let (cos, sin) = self.trig[line.theta];
        let rho = line.rho;

        let w = self.cols() as i64 - 1;
        let h = self.rows() as i64 - 1;

        let x_at = |y: f64| clamp_round((rho - sin * y) / cos);
        let y_at = |x: f64| clamp_round((rho - cos * x) / sin);

        let x_near = x_at(0.0);
        let y_near = y_at(0.0);
        let x_far = x_at(h as f64);
        let y_far = y_at(w as f64);

        let mut endpoints = BTreeSet::new();
        if (0..=h).contains(&y_near) {
            endpoints.insert(Point::new(0, y_near));
        }
        if (0..=w).contains(&x_near) {
            endpoints.insert(Point::new(x_near, 0));
        }
        if (0..=h).contains(&y_far) {
            endpoints.insert(Point::new(w, y_far));
        }
        if (0..=w).contains(&x_far) {
            endpoints.insert(Point::new(x_far, h));
        }

        match (endpoints.first(), endpoints.last()) {
            (Some(&a), Some(&b)) => Ok(Segment::new(a, b)),
            _ => Err(Error::NoIntersection(line)),
        }
    }

    /// Scan the channel around a candidate line for its longest run.
    ///
    /// The clipped segment is walked with the given half-width; at each
    /// canonical point the cross-section pixels that are pending or voted
    /// count as hits. A streak of more than `max_gap` hitless steps closes
    /// the current run and a later hit opens a new one. The longest run
    /// comes back as a [`PointSet`]; a channel with no hits at all reports
    /// [`Error::EmptyChannel`], since the accumulator just vouched for this
    /// line.
    pub fn scan(&self, line: Line, radius: u32, max_gap: u32) -> Result<PointSet> {
        let segment = self.line_intersect(line)?;
        let channel = Channel::new(segment.a, segment.b, i64::from(radius))?;

        let rows = self.rows() as i64;
        let cols = self.cols() as i64;

        let mut gap = max_gap + 1;
        let mut runs: Vec<PointSet> = Vec::new();

        for (canonical, pixels) in channel {
            let mut hits = Vec::new();
            for p in pixels {
                if p.x < 0 || p.x >= cols || p.y < 0 || p.y >= rows {
                    continue;
                }
                match self.raster[p.y as usize][p.x as usize] {
                    Status::Pending | Status::Voted => hits.push(p),
                    Status::Unset | Status::Done => {}
                }
            }

            if hits.is_empty() {
                gap += 1;
            } else {
                if gap > max_gap {
                    runs.push(PointSet::new());
                }
                if let Some(run) = runs.last_mut() {
                    run.add_point(canonical, hits);
                }
                gap = 0;
            }
        }

        // Keep the first run among equals, so the outcome only depends on
        // the channel order.
        let mut longest: Option<PointSet> = None;
        for run in runs {
            let better = match &longest {
                Some(best) => run.length_squared() > best.length_squared(),
                None => true,
            };
            if better {
                longest = Some(run);
            }
        }

        longest.ok_or(Error::EmptyChannel(line))
    }
}

/// Round to the nearest integer, saturating at the representable range.
fn clamp_round(v: f64) -> i64 {
    v.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_start_unset_and_advance() {
        let mut state = State::new(5, 5, 1);
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(state.status(Point::new(x, y)), Status::Unset);
            }
        }

        let p = Point::new(3, 2);
        state.mark_pending(p);
        assert_eq!(state.status(p), Status::Pending);

        assert_eq!(state.next(), Some(p));
        assert_eq!(state.status(p), Status::Voted);
        assert_eq!(state.next(), None);

        state.mark_done(p).expect("voted pixel retires");
        assert_eq!(state.status(p), Status::Done);
    }

    #[test]
    fn out_of_range_reads_are_unset() {
        let state = State::new(4, 4, 1);
        assert_eq!(state.status(Point::new(-1, 0)), Status::Unset);
        assert_eq!(state.status(Point::new(0, -1)), Status::Unset);
        assert_eq!(state.status(Point::new(4, 0)), Status::Unset);
        assert_eq!(state.status(Point::new(0, 4)), Status::Unset);
    }

    #[test]
    fn mark_done_rejects_unset_pixels() {
        let mut state = State::new(4, 4, 1);
        match state.mark_done(Point::new(1, 1)) {
            Err(Error::InvariantViolation { point, .. }) => {
                assert_eq!(point, Point::new(1, 1));
            }
            other => panic!("expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn next_skips_stale_queue_entries() {
        let mut state = State::new(4, 4, 9);
        let a = Point::new(0, 0);
        let b = Point::new(2, 2);
        state.mark_pending(a);
        state.mark_pending(b);

        // Retire one pixel behind the queue's back; only the other may be
        // drawn.
        state.mark_done(a).expect("pending pixel retires");
        assert_eq!(state.next(), Some(b));
        assert_eq!(state.next(), None);
    }

    #[test]
    fn next_is_deterministic_for_a_seed() {
        let fill = |seed| {
            let mut state = State::new(8, 8, seed);
            for y in 0..8 {
                for x in 0..8 {
                    state.mark_pending(Point::new(x, y));
                }
            }
            let mut drawn = Vec::new();
            while let Some(p) = state.next() {
                drawn.push(p);
            }
            drawn
        };

        assert_eq!(fill(1234), fill(1234));
        assert_ne!(fill(1234), fill(4321));
    }

    #[test]
    fn from_raster_queues_pending_pixels() {
        let mut raster: Raster<Status> = Raster::new(3, 3);
        raster[1][2] = Status::Pending;
        raster[2][0] = Status::Pending;
        raster[0][0] = Status::Done;

        let mut state = State::from_raster(raster, 5);
        let mut drawn = Vec::new();
        while let Some(p) = state.next() {
            drawn.push(p);
        }
        drawn.sort();
        assert_eq!(drawn, vec![Point::new(0, 2), Point::new(2, 1)]);
    }

    #[test]
    fn simple_intersection() {
        let state = State::new(240, 320, 1);
        let seg = state
            .line_intersect(Line::new(900, 100.0))
            .expect("line crosses the image");
        assert_eq!(seg, Segment::new(Point::new(0, 141), Point::new(141, 0)));
    }

    #[test]
    fn truncated_intersection() {
        let state = State::new(240, 320, 1);
        let seg = state
            .line_intersect(Line::new(900, 200.0))
            .expect("line crosses the image");
        assert_eq!(seg, Segment::new(Point::new(44, 239), Point::new(283, 0)));

        let seg = state
            .line_intersect(Line::new(900, 300.0))
            .expect("line crosses the image");
        assert_eq!(seg, Segment::new(Point::new(185, 239), Point::new(319, 105)));
    }

    #[test]
    fn degenerate_corner_intersections() {
        let state = State::new(240, 320, 1);

        let seg = state
            .line_intersect(Line::new(900, 0.0))
            .expect("corner touch");
        assert_eq!(seg, Segment::new(Point::new(0, 0), Point::new(0, 0)));

        let seg = state
            .line_intersect(Line::new(2700, 0.0))
            .expect("diagonal through the origin");
        assert_eq!(seg, Segment::new(Point::new(0, 0), Point::new(239, 239)));
    }

    #[test]
    fn missing_intersection_is_reported() {
        let state = State::new(240, 320, 1);
        match state.line_intersect(Line::new(900, 1000.0)) {
            Err(Error::NoIntersection(line)) => assert_eq!(line.theta, 900),
            other => panic!("expected NoIntersection, got {other:?}"),
        }
    }

    #[test]
    fn scan_returns_the_longest_run() {
        let mut state = State::new(20, 40, 3);
        // Two runs on the row y = 10: a short one and a long one, separated
        // by a gap too wide to bridge.
        for x in 2..6 {
            state.mark_pending(Point::new(x, 10));
        }
        for x in 15..35 {
            state.mark_pending(Point::new(x, 10));
        }

        // Line with theta = 90°: y = rho.
        let found = state
            .scan(Line::new(1800, 10.0), 1, 3)
            .expect("row contains set pixels");

        let segment = found.segment().expect("non-empty run");
        assert_eq!(segment, Segment::new(Point::new(15, 10), Point::new(34, 10)));
        assert_eq!(found.length_squared(), 19 * 19);
    }

    #[test]
    fn scan_bridges_small_gaps() {
        let mut state = State::new(20, 40, 3);
        for x in 5..15 {
            state.mark_pending(Point::new(x, 7));
        }
        // A two-pixel hole, below the max_gap of three.
        for x in 17..30 {
            state.mark_pending(Point::new(x, 7));
        }

        let found = state
            .scan(Line::new(1800, 7.0), 1, 3)
            .expect("row contains set pixels");
        assert_eq!(
            found.segment().expect("non-empty run"),
            Segment::new(Point::new(5, 7), Point::new(29, 7))
        );
    }

    #[test]
    fn scan_of_an_empty_channel_is_fatal() {
        let state = State::new(20, 40, 3);
        match state.scan(Line::new(1800, 10.0), 1, 3) {
            Err(Error::EmptyChannel(line)) => assert_eq!(line.theta, 1800),
            other => panic!("expected EmptyChannel, got {other:?}"),
        }
    }
}
