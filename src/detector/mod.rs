//! Driver orchestrating the vote/scan/commit loop.
//!
//! The detector draws pending pixels from the [`crate::state::State`] in
//! random order and feeds them to the [`crate::accumulator::Accumulator`].
//! When a vote rejects the noise hypothesis, the winning line is scanned
//! for its longest connected run; runs long enough to matter are recorded
//! and their pixels retired, withdrawing any votes they cast. A final
//! [`crate::postprocess::Postprocessor`] pass fuses collinear fragments.
//!
//! Modules
//! - `options` – the tunable [`DetectorParams`].
//! - `pipeline` – the [`Detector`] itself and the `find_segments` entry
//!   point.

pub mod options;
mod pipeline;

pub use options::DetectorParams;
pub use pipeline::{find_segments, Detector};
