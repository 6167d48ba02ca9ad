//! Combined local search and tour length evaluation.

use super::{three_opt, two_opt};
use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Runs 2-opt to convergence, then 3-opt if `use_three_opt` is set.
///
/// Returns `true` if either pass changed the tour.
///
/// # Examples
///
/// ```
/// use u_aco::models::{City, Tour};
/// use u_aco::distance::DistanceMatrix;
/// use u_aco::local_search::{improve, tour_length};
///
/// let cities = vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 1.0, 0.0),
///     City::new(2, 1.0, 1.0),
///     City::new(3, 0.0, 1.0),
/// ];
/// let dm = DistanceMatrix::from_cities(&cities);
///
/// let seq = vec![0, 2, 1, 3];
/// let mut tour = Tour::new(seq.clone(), tour_length(&seq, &dm));
/// assert!(improve(&mut tour, &dm, true));
/// assert!(!improve(&mut tour, &dm, true));
/// ```
pub fn improve(tour: &mut Tour, distances: &DistanceMatrix, use_three_opt: bool) -> bool {
    let mut improved = two_opt(tour, distances);
    if use_three_opt && three_opt(tour, distances) {
        improved = true;
    }
    improved
}

/// Total length of a closed tour, including the edge back to the start.
///
/// Returns `0.0` for an empty or single-city sequence.
pub fn tour_length(sequence: &[usize], distances: &DistanceMatrix) -> f64 {
    let n = sequence.len();
    if n < 2 {
        return 0.0;
    }
    let mut length = 0.0;
    for i in 0..n {
        length += distances.get(sequence[i], sequence[(i + 1) % n]);
    }
    length
}
