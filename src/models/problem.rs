//! Problem instance: cities plus precomputed distances.

use super::City;
use crate::constructive::nearest_neighbor_tour;
use crate::distance::DistanceMatrix;
use crate::error::{AcoError, AcoResult};

/// An immutable TSP instance.
///
/// Cities are addressed by their position in the instance. The distance
/// matrix is computed once at construction and never changes.
///
/// # Examples
///
/// ```
/// use u_aco::models::{City, ProblemInstance};
///
/// let instance = ProblemInstance::new(vec![
///     City::new(1, 0.0, 0.0),
///     City::new(2, 3.0, 0.0),
///     City::new(3, 0.0, 4.0),
/// ]).unwrap();
///
/// assert_eq!(instance.num_cities(), 3);
/// assert_eq!(instance.distance(1, 2), 5.0);
/// assert_eq!(instance.nearest_neighbor_tour_length(0), 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    cities: Vec<City>,
    distances: DistanceMatrix,
}

impl ProblemInstance {
    /// Builds an instance with Euclidean distances.
    ///
    /// The cities are assumed validated (finite coordinates, unique ids);
    /// only emptiness is rejected here.
    pub fn new(cities: Vec<City>) -> AcoResult<Self> {
        if cities.is_empty() {
            return Err(AcoError::EmptyInstance);
        }
        let distances = DistanceMatrix::from_cities(&cities);
        Ok(Self { cities, distances })
    }

    /// Builds an instance with an explicit distance matrix.
    ///
    /// The coordinates of `cities` are kept for reporting but not used for
    /// distances. The matrix must be symmetric to within `1e-9`.
    pub fn with_distances(cities: Vec<City>, distances: DistanceMatrix) -> AcoResult<Self> {
        if cities.is_empty() {
            return Err(AcoError::EmptyInstance);
        }
        if distances.size() != cities.len() {
            return Err(AcoError::DimensionMismatch {
                expected: cities.len(),
                actual: distances.size(),
            });
        }
        if !distances.is_symmetric(1e-9) {
            return Err(AcoError::invalid(
                "distances",
                format!("{0}x{0} matrix", distances.size()),
                "must be symmetric",
            ));
        }
        Ok(Self { cities, distances })
    }

    /// Distance between two cities.
    ///
    /// Out-of-range indices yield `0.0` rather than an error. Solvers inside
    /// this crate read [`distances`](Self::distances) directly and never rely
    /// on this.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.distances.checked_get(a, b).unwrap_or(0.0)
    }

    /// The full distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Number of cities.
    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }

    /// Returns `true` if the instance has no cities.
    ///
    /// Always `false` for an instance built through the constructors.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// All cities in index order.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// The city at `index`, if any.
    pub fn city(&self, index: usize) -> Option<&City> {
        self.cities.get(index)
    }

    /// Length of the greedy nearest-neighbor tour starting at `start`.
    ///
    /// Returns `0.0` for instances with one city, or when `start` is out of
    /// range.
    pub fn nearest_neighbor_tour_length(&self, start: usize) -> f64 {
        if self.num_cities() <= 1 {
            return 0.0;
        }
        nearest_neighbor_tour(&self.distances, start)
            .map(|t| t.length())
            .unwrap_or(0.0)
    }
}
