//! Nearest-neighbor constructive heuristic.
//!
//! Builds a closed tour greedily: starting from a given city, always move to
//! the nearest unvisited city, then return to the start.
//!
//! # Complexity
//!
//! O(n²) where n = number of cities.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E. & Lewis, P.M. (1977). "An analysis of
//! several heuristics for the traveling salesman problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Constructs a TSP tour using the nearest-neighbor heuristic.
///
/// Ties are broken by the lowest city index. Returns `None` if `start` is
/// not a valid city index (including the empty matrix).
///
/// # Examples
///
/// ```
/// use u_aco::models::City;
/// use u_aco::distance::DistanceMatrix;
/// use u_aco::constructive::nearest_neighbor_tour;
///
/// let cities = vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 10.0, 0.0),
///     City::new(2, 1.0, 0.0),
/// ];
/// let dm = DistanceMatrix::from_cities(&cities);
///
/// let tour = nearest_neighbor_tour(&dm, 0).unwrap();
/// assert_eq!(tour.sequence(), &[0, 2, 1]);
/// assert!((tour.length() - 20.0).abs() < 1e-10);
/// ```
pub fn nearest_neighbor_tour(distances: &DistanceMatrix, start: usize) -> Option<Tour> {
    let n = distances.size();
    if start >= n {
        return None;
    }

    let mut visited = vec![false; n];
    visited[start] = true;
    let mut sequence = Vec::with_capacity(n);
    sequence.push(start);

    let mut current = start;
    let mut length = 0.0;

    while sequence.len() < n {
        let mut best: Option<(usize, f64)> = None;
        for (city, &seen) in visited.iter().enumerate() {
            if seen {
                continue;
            }
            let d = distances.get(current, city);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((city, d)),
            }
        }

        match best {
            Some((next, d)) => {
                visited[next] = true;
                sequence.push(next);
                length += d;
                current = next;
            }
            None => break,
        }
    }

    length += distances.get(current, start);
    Some(Tour::new(sequence, length))
}
