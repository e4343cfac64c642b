//! Error types for the detector.
//!
//! All conditions propagate to the driver loop, which decides per kind:
//! a line that misses the image or clips to a single corner is logged and
//! skipped, while accumulator/state desynchronization aborts the run.

use crate::types::{Line, Point};
use thiserror::Error;

/// Errors surfaced by the detection pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A zero-length segment was handed to the channel scanner.
    #[error("channel endpoints must be distinct, got {0} twice")]
    InvalidSegment(Point),

    /// A line does not meet the image rectangle.
    #[error("line {0} does not intersect the image")]
    NoIntersection(Line),

    /// A scan along an accepted line found no set pixels, which means the
    /// accumulator and the state raster disagree about the image.
    #[error("no set pixels in the scan channel for line {0}")]
    EmptyChannel(Line),

    /// Bookkeeping contradiction: an unvote hit a zero counter, or a pixel
    /// in an impossible status was asked to transition.
    #[error("invariant violation at {point}: {detail}")]
    InvariantViolation { point: Point, detail: String },

    /// The trigonometry table was asked for an odd parts-per-semiturn count.
    #[error("parts per semiturn must be even, got {0}")]
    TrigTableConfig(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
