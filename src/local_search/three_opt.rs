//! 3-opt improvement for closed tours.
//!
//! # Algorithm
//!
//! For cut positions i < j < k the tour splits into four segments:
//!
//! ```text
//! A = t[..=i], B = t[i+1..=j], C = t[j+1..=k], D = t[k+1..]
//! ```
//!
//! Four reconnections are evaluated:
//!
//! 1. A - B' - C - D (reverse B)
//! 2. A - B - C' - D (reverse C)
//! 3. A - B' - C' - D (reverse both)
//! 4. A - C - B - D (swap B and C)
//!
//! The remaining reconnections (swap with one or both segments reversed) are
//! not considered. Unlike 2-opt, each sweep tracks the single best move over
//! all (i, j, k) and applies only that one, then sweeps again.
//!
//! # Complexity
//!
//! O(n³) per sweep.
//!
//! # Reference
//!
//! Lin, S. (1965). "Computer Solutions of the Traveling Salesman Problem",
//! *Bell System Technical Journal* 44(10), 2245-2269.

use super::{tour_length, IMPROVEMENT_EPSILON};
use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// The reconnection applied by a 3-opt move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reconnection {
    ReverseFirst,
    ReverseSecond,
    ReverseBoth,
    Swap,
}

#[derive(Debug, Clone, Copy)]
struct Move {
    i: usize,
    j: usize,
    k: usize,
    kind: Reconnection,
}

/// Applies 3-opt to a tour until no improving move remains.
///
/// Returns `true` if the tour was changed; its length is then recomputed
/// exactly from the new sequence. Tours with fewer than 6 cities are left
/// untouched.
///
/// # Examples
///
/// ```
/// use u_aco::models::{City, Tour};
/// use u_aco::distance::DistanceMatrix;
/// use u_aco::local_search::{three_opt, tour_length};
///
/// let cities: Vec<City> = (0..6)
///     .map(|i| City::new(i, (i % 3) as f64 * 10.0, (i / 3) as f64 * 10.0))
///     .collect();
/// let dm = DistanceMatrix::from_cities(&cities);
///
/// let seq = vec![0, 4, 2, 3, 1, 5];
/// let before = tour_length(&seq, &dm);
/// let mut tour = Tour::new(seq, before);
/// assert!(three_opt(&mut tour, &dm));
/// assert!(tour.length() < before);
/// assert!(tour.validate(6));
/// ```
pub fn three_opt(tour: &mut Tour, distances: &DistanceMatrix) -> bool {
    let n = tour.len();
    if n < 6 {
        return false;
    }

    let mut current = tour.sequence().to_vec();
    let mut any_improvement = false;

    while let Some(mv) = best_move(&current, distances) {
        current = apply_move(&current, mv);
        any_improvement = true;
    }

    if any_improvement {
        let length = tour_length(&current, distances);
        tour.set(current, length);
    }
    any_improvement
}

/// Scans every valid (i, j, k) and returns the most improving move.
fn best_move(tour: &[usize], distances: &DistanceMatrix) -> Option<Move> {
    let n = tour.len();
    let mut best_delta = 0.0;
    let mut best: Option<Move> = None;

    for i in 0..n - 4 {
        for j in (i + 2)..n - 2 {
            for k in (j + 2)..n {
                if i == 0 && k == n - 1 {
                    continue;
                }

                let a = tour[i];
                let b = tour[i + 1];
                let c = tour[j];
                let d = tour[j + 1];
                let e = tour[k];
                let f = tour[(k + 1) % n];

                let old_cost = distances.get(a, b) + distances.get(c, d) + distances.get(e, f);

                let candidates = [
                    (
                        Reconnection::ReverseFirst,
                        distances.get(a, c) + distances.get(b, d) + distances.get(e, f),
                    ),
                    (
                        Reconnection::ReverseSecond,
                        distances.get(a, b) + distances.get(c, e) + distances.get(d, f),
                    ),
                    (
                        Reconnection::ReverseBoth,
                        distances.get(a, c) + distances.get(b, e) + distances.get(d, f),
                    ),
                    (
                        Reconnection::Swap,
                        distances.get(a, d) + distances.get(e, b) + distances.get(c, f),
                    ),
                ];

                for (kind, new_cost) in candidates {
                    let delta = new_cost - old_cost;
                    if delta < best_delta - IMPROVEMENT_EPSILON {
                        best_delta = delta;
                        best = Some(Move { i, j, k, kind });
                    }
                }
            }
        }
    }

    best
}

fn apply_move(tour: &[usize], mv: Move) -> Vec<usize> {
    let Move { i, j, k, kind } = mv;
    let seg_a = &tour[..=i];
    let seg_b = &tour[i + 1..=j];
    let seg_c = &tour[j + 1..=k];
    let seg_d = &tour[k + 1..];

    let mut next = Vec::with_capacity(tour.len());
    next.extend_from_slice(seg_a);
    match kind {
        Reconnection::ReverseFirst => {
            next.extend(seg_b.iter().rev());
            next.extend_from_slice(seg_c);
        }
        Reconnection::ReverseSecond => {
            next.extend_from_slice(seg_b);
            next.extend(seg_c.iter().rev());
        }
        Reconnection::ReverseBoth => {
            next.extend(seg_b.iter().rev());
            next.extend(seg_c.iter().rev());
        }
        Reconnection::Swap => {
            next.extend_from_slice(seg_c);
            next.extend_from_slice(seg_b);
        }
    }
    next.extend_from_slice(seg_d);
    next
}
