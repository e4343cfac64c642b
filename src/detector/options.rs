//! Tunable parameters of the detector.

use serde::Deserialize;

/// Knobs controlling the full detection pipeline.
///
/// Defaults are reasonable for line drawings at common raster sizes; the
/// consistency of the values is the caller's responsibility.
#[derive(Clone, Debug, Deserialize)]
pub struct DetectorParams {
    /// Width of the scan channel in pixels. The channel half-width is
    /// `channel_width / 2`.
    pub channel_width: u32,
    /// Maximum run of consecutive missed pixels tolerated inside one scan
    /// segment. Crossing segments erase each other's pixels, so this
    /// should be no less than `channel_width`.
    pub max_gap: u32,
    /// Minimum accepted segment length in pixels. Shorter runs are left
    /// unscanned for later votes to revisit.
    pub min_length: u32,
    /// Probability below which the accumulator rejects the null
    /// hypothesis. Lowering it trades missed short segments for fewer
    /// false positives.
    pub threshold: f64,
    /// Votes required in a bin before the significance test applies; the
    /// Poisson approximation is meaningless for the first few counts.
    pub min_trigger_points: u16,
    /// Postprocessor endpoint neighborhood radius, in pixels. `None`
    /// falls back to the channel half-width.
    pub gap_limit: Option<i64>,
    /// Postprocessor angular tolerance in parts of a semiturn (0.05°
    /// each).
    pub angle_tolerance: usize,
    /// Seed for both the sampling and tie-breaking generators. `None`
    /// draws a fresh seed, making the run non-reproducible.
    pub seed: Option<u64>,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            channel_width: 3,
            max_gap: 3,
            min_length: 10,
            threshold: 1e-12,
            min_trigger_points: 3,
            gap_limit: None,
            angle_tolerance: 80,
            seed: None,
        }
    }
}

impl DetectorParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the channel width.
    pub fn with_channel_width(mut self, pixels: u32) -> Self {
        self.channel_width = pixels;
        self
    }

    /// Builder-style setter for the scan gap tolerance.
    pub fn with_max_gap(mut self, pixels: u32) -> Self {
        self.max_gap = pixels;
        self
    }

    /// Builder-style setter for the minimum segment length.
    pub fn with_min_length(mut self, pixels: u32) -> Self {
        self.min_length = pixels;
        self
    }

    /// Builder-style setter for the null-hypothesis threshold.
    pub fn with_threshold(mut self, probability: f64) -> Self {
        self.threshold = probability;
        self
    }

    /// Builder-style setter for the detection seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
