//! Precomputed (cos θ, sin θ) table quantized in parts per semiturn.

use crate::error::{Error, Result};
use std::ops::Index;

/// Angular resolution of the detector: parts per semiturn, so one part is
/// 0.05°. One full turn is `2 * MAX_THETA` parts.
pub const MAX_THETA: usize = 3600;

const _: () = assert!(MAX_THETA % 2 == 0, "parts per semiturn must be even");

/// A table of cosine/sine pairs for θ ∈ [0, parts).
///
/// Entries in the second quadrant are derived from the first by the
/// quarter-turn identities `cos(θ + π/2) = −sin θ`, `sin(θ + π/2) = cos θ`,
/// so antipodal angles stay bit-exact mirrors of each other.
#[derive(Clone, Debug)]
pub struct TrigTable {
    parts: usize,
    table: Vec<(f64, f64)>,
}

impl TrigTable {
    /// Build a table with the given parts per semiturn.
    ///
    /// The count must be even so the quarter-turn symmetry holds; an odd
    /// count is a configuration error.
    pub fn with_parts(parts: usize) -> Result<Self> {
        if parts % 2 != 0 {
            return Err(Error::TrigTableConfig(parts));
        }
        Ok(Self::build(parts))
    }

    /// The table for the crate-wide resolution [`MAX_THETA`].
    pub fn semiturn() -> Self {
        Self::build(MAX_THETA)
    }

    fn build(parts: usize) -> Self {
        let mut table = vec![(0.0, 0.0); parts];
        let radians_per_part = std::f64::consts::PI / parts as f64;

        for theta in 0..parts / 2 {
            let (sin, cos) = (theta as f64 * radians_per_part).sin_cos();
            table[theta] = (cos, sin);
            table[theta + parts / 2] = (-sin, cos);
        }

        Self { parts, table }
    }

    /// Parts per semiturn of this table.
    pub fn parts(&self) -> usize {
        self.parts
    }
}

impl Index<usize> for TrigTable {
    type Output = (f64, f64);

    /// The (cos θ, sin θ) pair. `theta` must be in `[0, parts)`.
    fn index(&self, theta: usize) -> &(f64, f64) {
        &self.table[theta]
    }
}
