//! Vote matrix over quantized (θ, ρ) space with a Poisson significance test.
//!
//! Every vote increments one counter per θ column, so under the null
//! hypothesis — the image is uniform random noise — a counter behaves like a
//! Poisson variable with rate `λ = votes / max_rho`:
//!
//! ```text
//!    p(n) = λⁿ/Γ(n+1)·exp(-λ)
//! ln p(n) = n·ln(λ) - lnΓ(n+1) - λ
//! ```
//!
//! When the probability of the best bin's count arising from noise drops
//! below the configured threshold, the null hypothesis is rejected and the
//! bin's line is handed back for a channel scan.

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::trig::{TrigTable, MAX_THETA};
use crate::types::{Line, Point};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Counter matrix and candidate selection for line voting.
pub struct Accumulator {
    trig: TrigTable,
    /// Exponent by which raw rho values are scaled before quantization.
    rho_scale: i32,
    /// Height of the counter matrix.
    max_rho: usize,
    counters: Raster<u16>,
    /// Votes still in effect.
    votes: u64,
    /// Candidate bins sharing the current maximum, reused across votes.
    candidates: Vec<Line>,
    // Reserved for randomized tie-breaking; selection is currently the
    // deterministic gcd rule.
    #[allow(dead_code)]
    rng: StdRng,
    /// Natural log of the probability below which the null hypothesis is
    /// rejected.
    pub log_threshold: f64,
    /// Counter floor before the Poisson test is applied.
    pub min_trigger_points: u16,
}

impl Accumulator {
    /// Scaling parameters for rho given the image dimensions.
    ///
    /// Returns `(max_rho, rho_scale)`: the height of the counter matrix and
    /// the exponent by which raw rho values are scaled. The height is chosen
    /// from the two powers of two bracketing [`MAX_THETA`] so the matrix is
    /// as close to square as possible; it is always odd, so half of it is a
    /// usable centering offset.
    pub fn rho_info(rows: usize, cols: usize) -> (usize, i32) {
        let diag = (rows as f64 - 1.0).hypot(cols as f64 - 1.0).ceil();
        let rho_exp = (MAX_THETA as f64 / (diag * 2.0 + 1.0)).log2().floor() as i32;

        // lo is 2 * diag * 2^rho_exp + 1, the largest candidate height not
        // exceeding MAX_THETA; hi is one doubling further.
        let lo = (diag * f64::powi(2.0, rho_exp + 1)).ceil() as usize + 1;
        let hi = (diag * f64::powi(2.0, rho_exp + 2)).ceil() as usize + 1;

        debug_assert!(lo <= MAX_THETA && MAX_THETA <= hi);

        if MAX_THETA - lo <= hi - MAX_THETA {
            (lo, rho_exp)
        } else {
            (hi, rho_exp + 1)
        }
    }

    /// Create an accumulator sized for a `rows × cols` image.
    ///
    /// `seed` primes the tie-breaking generator; the current selection rule
    /// never draws from it, so detection stays deterministic.
    pub fn new(rows: usize, cols: usize, seed: u64) -> Self {
        let (max_rho, rho_scale) = Self::rho_info(rows, cols);

        Self {
            trig: TrigTable::semiturn(),
            rho_scale,
            max_rho,
            counters: Raster::new(max_rho, MAX_THETA),
            votes: 0,
            candidates: Vec::with_capacity(64),
            rng: StdRng::seed_from_u64(seed),
            log_threshold: 1e-12f64.ln(),
            min_trigger_points: 3,
        }
    }

    /// Number of votes currently in effect.
    pub fn votes(&self) -> u64 {
        self.votes
    }

    /// Quantize a raw rho value into a counter-matrix row, offset so the
    /// matrix is centered on rho = 0.
    fn scale_rho(&self, unscaled: f64) -> f64 {
        let offset = (self.max_rho >> 1) as f64;
        (unscaled * f64::powi(2.0, self.rho_scale) + offset).round_ties_even()
    }

    /// Invert [`Self::scale_rho`].
    fn unscale_rho(&self, scaled: f64) -> f64 {
        let offset = (self.max_rho >> 1) as f64;
        (scaled - offset) * f64::powi(2.0, -self.rho_scale)
    }

    /// Register votes for every line through `p`.
    ///
    /// Returns the winning line once the largest counter is implausible
    /// under the noise hypothesis, `None` otherwise. Counting, maximum
    /// tracking, and candidate collection happen in a single pass over θ;
    /// bins whose quantized rho falls outside the matrix are skipped.
    pub fn vote(&mut self, p: Point) -> Option<Line> {
        let mut n = self.min_trigger_points;
        self.candidates.clear();

        for theta in 0..MAX_THETA {
            let (cos, sin) = self.trig[theta];
            let rho = self.scale_rho(p.x as f64 * cos + p.y as f64 * sin);
            if rho < 0.0 || rho >= self.max_rho as f64 {
                continue;
            }

            let row = rho as usize;
            let count = {
                let cell = &mut self.counters[row][theta];
                *cell += 1;
                *cell
            };

            // A new maximum invalidates every candidate collected so far.
            if n < count {
                n = count;
                self.candidates.clear();
            }
            if n == count {
                let unscaled = self.unscale_rho(rho);
                self.candidates.push(Line::new(theta, unscaled));
            }
        }

        self.votes += 1;

        if self.candidates.is_empty() {
            return None;
        }

        let lambda = self.votes as f64 / self.max_rho as f64;
        let lnp = f64::from(n) * lambda.ln() - ln_factorial(u64::from(n)) - lambda;

        if lnp >= self.log_threshold {
            return None;
        }

        Some(self.best_candidate())
    }

    /// Prefer lines whose angle is a simple fraction of π.
    ///
    /// The candidate with the largest `gcd(θ, MAX_THETA / 2)` wins; ties
    /// keep the first-seen candidate, so the outcome is fully determined by
    /// the counter state.
    fn best_candidate(&self) -> Line {
        let half = MAX_THETA / 2;
        let mut best = self.candidates[0];
        let mut best_gcd = gcd(best.theta, half);

        for &line in &self.candidates[1..] {
            let g = gcd(line.theta, half);
            if best_gcd < g {
                best = line;
                best_gcd = g;
            }
        }

        best
    }

    /// Withdraw the votes registered by a matching [`Self::vote`] call.
    pub fn unvote(&mut self, p: Point) -> Result<()> {
        for theta in 0..MAX_THETA {
            let (cos, sin) = self.trig[theta];
            let rho = self.scale_rho(p.x as f64 * cos + p.y as f64 * sin);
            if rho < 0.0 || rho >= self.max_rho as f64 {
                continue;
            }

            let cell = &mut self.counters[rho as usize][theta];
            if *cell == 0 {
                return Err(Error::InvariantViolation {
                    point: p,
                    detail: "unvote underflows a counter".into(),
                });
            }
            *cell -= 1;
        }

        self.votes -= 1;
        Ok(())
    }
}

/// ln(n!) = lnΓ(n + 1).
///
/// Exact log summation for small n; Stirling's series beyond, where the
/// truncation error is far below the probability resolution the test needs.
fn ln_factorial(n: u64) -> f64 {
    if n < 32 {
        (2..=n).map(|k| (k as f64).ln()).sum()
    } else {
        let x = (n + 1) as f64;
        (x - 0.5) * x.ln() - x + 0.5 * (2.0 * std::f64::consts::PI).ln() + 1.0 / (12.0 * x)
            - 1.0 / (360.0 * x.powi(3))
            + 1.0 / (1260.0 * x.powi(5))
    }
}

fn gcd(a: usize, b: usize) -> usize {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
