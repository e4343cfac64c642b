//! Structured statistics describing a detection run.
//!
//! The report is serializable so callers can persist it next to the
//! segments; the demo binary emits it as JSON.

use crate::types::Segment;
use serde::Serialize;

/// Counters gathered over one pass of the driver loop.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct RunStats {
    /// Pixels drawn from the pending queue.
    pub pixels_drawn: usize,
    /// Votes that rejected the null hypothesis.
    pub scans_triggered: usize,
    /// Scans whose longest run reached the length floor.
    pub scans_accepted: usize,
    /// Scans discarded because the longest run fell short.
    pub scans_discarded: usize,
    /// Candidate lines that missed the image or clipped to a corner.
    pub degenerate_lines: usize,
    /// Accepted segments before the fusion pass.
    pub raw_segments: usize,
}

/// Detection outcome plus the statistics gathered along the way.
#[derive(Clone, Debug, Serialize)]
pub struct DetectionReport {
    /// The fused segments, as returned by the detector.
    pub segments: Vec<Segment>,
    pub stats: RunStats,
    /// Wall-clock duration of the run in milliseconds.
    pub latency_ms: f64,
}
