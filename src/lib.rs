#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod state;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
pub mod accumulator;
pub mod channel;
pub mod point_set;
pub mod postprocess;
pub mod raster;
pub mod trig;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + parameters + state.
pub use crate::detector::{find_segments, Detector, DetectorParams};
pub use crate::diagnostics::{DetectionReport, RunStats};
pub use crate::error::{Error, Result};
pub use crate::state::State;
pub use crate::types::{Line, Point, Segment, Status};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use hough_detector::prelude::*;
///
/// # fn main() -> hough_detector::Result<()> {
/// let mut state = State::new(240, 320, 42);
/// state.mark_pending(Point::new(10, 10));
///
/// let detector = Detector::new(DetectorParams::default());
/// let segments = detector.find_segments(&mut state)?;
/// println!("{} segments", segments.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::state::State;
    pub use crate::types::{Line, Point, Segment, Status};
    pub use crate::{Detector, DetectorParams};
}
