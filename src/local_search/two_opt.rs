//! 2-opt improvement for closed tours.
//!
//! # Algorithm
//!
//! For each pair of edges (i, i+1) and (j, j+1) in the tour, compute the
//! change in length from reconnecting them as (i, j) and (i+1, j+1):
//!
//! ```text
//! delta = d(t[i], t[j]) + d(t[i+1], t[j+1]) - d(t[i], t[i+1]) - d(t[j], t[j+1])
//! ```
//!
//! If delta < -1e-9, reverse the segment [i+1..=j] and keep scanning. Sweeps
//! repeat until one full sweep applies no move.
//!
//! # Complexity
//!
//! O(n²) per sweep.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::{tour_length, IMPROVEMENT_EPSILON};
use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Applies 2-opt to a tour until no improving move remains.
///
/// Returns `true` if the tour was changed; its length is then recomputed
/// exactly from the new sequence. Tours with fewer than 4 cities are left
/// untouched.
///
/// # Examples
///
/// ```
/// use u_aco::models::{City, Tour};
/// use u_aco::distance::DistanceMatrix;
/// use u_aco::local_search::{two_opt, tour_length};
///
/// let cities = vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 10.0, 0.0),
///     City::new(2, 10.0, 10.0),
///     City::new(3, 0.0, 10.0),
/// ];
/// let dm = DistanceMatrix::from_cities(&cities);
///
/// let crossed = vec![0, 2, 1, 3];
/// let mut tour = Tour::new(crossed.clone(), tour_length(&crossed, &dm));
/// assert!(two_opt(&mut tour, &dm));
/// assert!((tour.length() - 40.0).abs() < 1e-9);
/// ```
pub fn two_opt(tour: &mut Tour, distances: &DistanceMatrix) -> bool {
    let n = tour.len();
    if n < 4 {
        return false;
    }

    let mut current = tour.sequence().to_vec();
    let mut any_improvement = false;
    let mut improved = true;

    while improved {
        improved = false;

        for i in 0..n - 2 {
            for j in (i + 2)..n {
                // Edges (0,1) and (n-1,0) share city 0.
                if i == 0 && j == n - 1 {
                    continue;
                }
                if two_opt_delta(&current, distances, i, j) < -IMPROVEMENT_EPSILON {
                    current[i + 1..=j].reverse();
                    improved = true;
                    any_improvement = true;
                }
            }
        }
    }

    if any_improvement {
        let length = tour_length(&current, distances);
        tour.set(current, length);
    }
    any_improvement
}

/// Length change from replacing edges (i, i+1) and (j, j+1) with
/// (i, j) and (i+1, j+1).
fn two_opt_delta(tour: &[usize], distances: &DistanceMatrix, i: usize, j: usize) -> f64 {
    let n = tour.len();
    let a = tour[i];
    let b = tour[i + 1];
    let c = tour[j];
    let d = tour[(j + 1) % n];

    let old_cost = distances.get(a, b) + distances.get(c, d);
    let new_cost = distances.get(a, c) + distances.get(b, d);

    new_cost - old_cost
}
