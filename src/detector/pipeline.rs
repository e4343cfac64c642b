//! The vote/scan/commit loop.

use super::options::DetectorParams;
use crate::accumulator::Accumulator;
use crate::diagnostics::{DetectionReport, RunStats};
use crate::error::{Error, Result};
use crate::postprocess::Postprocessor;
use crate::state::State;
use crate::types::Segment;
use log::{debug, warn};
use std::time::Instant;

/// Line-segment detector over a populated [`State`].
pub struct Detector {
    params: DetectorParams,
}

impl Detector {
    pub fn new(params: DetectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Run the detection loop to completion and return the fused segments.
    ///
    /// Pixels are drawn from the state until none remain pending. Every
    /// drawn pixel votes; a vote that rejects the noise hypothesis triggers
    /// a channel scan of the winning line, and the longest run is accepted
    /// when it reaches `min_length`. Accepted runs retire their pixels and
    /// withdraw their votes. Runs that come up short are discarded whole:
    /// the triggering pixel stays voted and its votes stand, so the
    /// evidence keeps accumulating for a later draw.
    ///
    /// Lines that miss the image or clip to a single corner are logged and
    /// skipped; [`Error::EmptyChannel`] and [`Error::InvariantViolation`]
    /// abort the run, since they mean the accumulator and the raster have
    /// diverged.
    pub fn find_segments(&self, state: &mut State) -> Result<Vec<Segment>> {
        Ok(self.find_segments_with_report(state)?.segments)
    }

    /// Like [`Self::find_segments`], but also returns run statistics and
    /// timing.
    pub fn find_segments_with_report(&self, state: &mut State) -> Result<DetectionReport> {
        let params = &self.params;
        let seed = params.seed.unwrap_or_else(rand::random);
        let radius = params.channel_width / 2;
        let min_length_squared = i64::from(params.min_length) * i64::from(params.min_length);

        let mut accumulator = Accumulator::new(state.rows(), state.cols(), seed);
        accumulator.log_threshold = params.threshold.ln();
        accumulator.min_trigger_points = params.min_trigger_points;

        debug!(
            "find_segments: {}x{} image, seed {seed}, channel radius {radius}",
            state.cols(),
            state.rows()
        );

        let started = Instant::now();
        let mut stats = RunStats::default();
        let mut segments = Vec::new();

        while let Some(pixel) = state.next() {
            stats.pixels_drawn += 1;

            let Some(line) = accumulator.vote(pixel) else {
                continue;
            };
            stats.scans_triggered += 1;

            let found = match state.scan(line, radius, params.max_gap) {
                Ok(found) => found,
                Err(err @ (Error::NoIntersection(_) | Error::InvalidSegment(_))) => {
                    warn!("skipping line {line} triggered by {pixel}: {err}");
                    stats.degenerate_lines += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            if found.length_squared() < min_length_squared {
                stats.scans_discarded += 1;
                continue;
            }
            stats.scans_accepted += 1;

            if let Some(segment) = found.segment() {
                debug!("accepted {segment} with {} pixels", found.len());
                segments.push(segment);
            }
            found.commit(state, &mut accumulator)?;
        }

        stats.raw_segments = segments.len();

        let postprocessor = Postprocessor {
            gap_limit: params.gap_limit.unwrap_or(i64::from(radius)),
            angle_tolerance: params.angle_tolerance,
        };
        postprocessor.fuse(&mut segments);

        debug!("find_segments: {} segments detected", segments.len());
        Ok(DetectionReport {
            segments,
            stats,
            latency_ms: started.elapsed().as_secs_f64() * 1e3,
        })
    }
}

/// Detect segments with explicit knobs; see [`Detector::find_segments`].
pub fn find_segments(
    state: &mut State,
    channel_width: u32,
    max_gap: u32,
    min_length: u32,
    seed: u64,
) -> Result<Vec<Segment>> {
    Detector::new(DetectorParams {
        channel_width,
        max_gap,
        min_length,
        seed: Some(seed),
        ..DetectorParams::default()
    })
    .find_segments(state)
}
