//! Fusion of near-collinear, near-adjacent segments.
//!
//! Scanning the same ink from different triggering pixels tends to leave
//! chains of short segments along one underlying line. This pass walks the
//! segment list and repeatedly extends each segment through neighbors whose
//! tail sits within `gap_limit` of its head and whose far endpoint keeps
//! the joint nearly straight.
//!
//! Each segment contributes two directed views — one per orientation — to a
//! search pool, so the head extension never has to branch on which way a
//! neighbor happens to be stored. A merge consumes the neighbor: both of
//! its views leave the pool and the undirected segment leaves the primary
//! list, which bounds the whole pass at one merge per removed segment.

mod kd;

use crate::trig::MAX_THETA;
use crate::types::{Point, Segment};
use kd::{kd_search, Keyed};
use log::debug;
use nalgebra::Vector2;

/// One orientation of a pool segment, searchable by its tail.
#[derive(Clone, Copy)]
struct DirectedView {
    tail: Point,
    head: Point,
    /// Index of the undirected segment in the primary list.
    index: usize,
}

impl Keyed for DirectedView {
    fn key(&self) -> Point {
        self.tail
    }
}

/// Configuration for the segment fuser.
#[derive(Clone, Copy, Debug)]
pub struct Postprocessor {
    /// Radius of the endpoint neighborhood searched for continuation
    /// candidates, in pixels.
    pub gap_limit: i64,
    /// Largest allowed deviation from a straight joint, in parts of
    /// [`MAX_THETA`] (one part is 0.05°).
    pub angle_tolerance: usize,
}

impl Default for Postprocessor {
    fn default() -> Self {
        Self {
            gap_limit: 1,
            angle_tolerance: 80,
        }
    }
}

impl Postprocessor {
    /// Fuse mergeable segments in place.
    ///
    /// Both endpoints of every segment are extended until no candidate in
    /// the pool qualifies. Merged segments are removed from the list; the
    /// relative order of survivors is not preserved.
    pub fn fuse(&self, segments: &mut Vec<Segment>) {
        // cos of the joint angle must be at or below this, i.e. the joint
        // must stay within angle_tolerance of a straight line.
        let threshold = -f64::cos(self.angle_tolerance as f64 * std::f64::consts::PI
            / MAX_THETA as f64);
        let initial = segments.len();

        let mut i = 0;
        while i < segments.len() {
            let mut pool: Vec<DirectedView> = Vec::new();
            for (index, segment) in segments.iter().enumerate().skip(i + 1) {
                pool.push(DirectedView {
                    tail: segment.a,
                    head: segment.b,
                    index,
                });
                pool.push(DirectedView {
                    tail: segment.b,
                    head: segment.a,
                    index,
                });
            }

            for _pass in 0..2 {
                'extend: loop {
                    let current = segments[i];
                    let mut neighbors = Vec::new();
                    kd_search(&mut pool, current.b, self.gap_limit, &mut neighbors);

                    for neighbor in neighbors {
                        if !joint_is_straight(current, neighbor, threshold) {
                            continue;
                        }

                        // Absorb the neighbor: our head jumps to its far
                        // endpoint and its undirected segment disappears
                        // from both lists.
                        segments[i].b = neighbor.head;

                        let gone = neighbor.index;
                        let last = segments.len() - 1;
                        segments.swap(gone, last);
                        segments.pop();
                        pool.retain(|view| view.index != gone);
                        for view in &mut pool {
                            if view.index == last {
                                view.index = gone;
                            }
                        }

                        continue 'extend;
                    }

                    break;
                }

                // Second pass extends the opposite endpoint; the double
                // reversal restores the original orientation.
                segments[i] = segments[i].reversed();
            }

            i += 1;
        }

        if segments.len() != initial {
            debug!(
                "postprocess: fused {} segments into {}",
                initial,
                segments.len()
            );
        }
    }
}

/// Test whether appending `neighbor` to `current` keeps the line straight.
///
/// With the joint midpoint `m` between our head and the neighbor's tail,
/// the vectors from `m` back to our tail and forward to the neighbor's head
/// must be close to opposite: their cosine at or below the (negative)
/// threshold.
fn joint_is_straight(current: Segment, neighbor: DirectedView, threshold: f64) -> bool {
    let m = Vector2::new(
        (current.b.x + neighbor.tail.x) as f64 / 2.0,
        (current.b.y + neighbor.tail.y) as f64 / 2.0,
    );
    let v1 = Vector2::new(current.a.x as f64, current.a.y as f64) - m;
    let v2 = Vector2::new(neighbor.head.x as f64, neighbor.head.y as f64) - m;

    let scale = v1.norm() * v2.norm();
    if scale == 0.0 {
        return false;
    }

    v1.dot(&v2) / scale <= threshold
}
