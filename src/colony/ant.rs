//! A single ant: probabilistic tour construction.
//!
//! # Transition rule
//!
//! From the current city `i`, every unvisited city `c` gets the weight
//!
//! ```text
//! w(c) = τ(i, c)^α · (1 / max(d(i, c), ε))^β
//! ```
//!
//! and the next city is drawn by roulette-wheel selection over the
//! normalized weights. When the total weight is zero (or not finite) the ant
//! falls back to a uniform choice among the unvisited cities.
//!
//! # Reference
//!
//! Dorigo, M., Maniezzo, V. & Colorni, A. (1996). "Ant System: Optimization
//! by a colony of cooperating agents", *IEEE Transactions on Systems, Man,
//! and Cybernetics, Part B* 26(1), 29-41.

use rand::Rng;

use crate::distance::DistanceMatrix;
use crate::error::{AcoError, AcoResult};
use crate::models::Tour;
use crate::pheromone::PheromoneField;

/// Substituted for zero distances between coincident cities.
const MIN_DISTANCE: f64 = 1e-10;

/// An ant building one tour.
///
/// Starts at a single city, visits every other city exactly once, then
/// closes the loop in [`complete_tour`](Ant::complete_tour). Reusable across
/// iterations through [`reset`](Ant::reset), which keeps its buffers.
///
/// # Examples
///
/// ```
/// use u_aco::colony::Ant;
/// use u_aco::models::City;
/// use u_aco::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_cities(&[
///     City::new(0, 0.0, 0.0),
///     City::new(1, 3.0, 0.0),
///     City::new(2, 0.0, 4.0),
/// ]);
///
/// let mut ant = Ant::new(0, 3).unwrap();
/// ant.visit_city(1, &dm).unwrap();
/// ant.visit_city(2, &dm).unwrap();
/// let tour = ant.complete_tour(&dm).unwrap();
/// assert_eq!(tour.sequence(), &[0, 1, 2]);
/// assert_eq!(tour.length(), 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct Ant {
    current: usize,
    sequence: Vec<usize>,
    visited: Vec<bool>,
    length: f64,
    candidates: Vec<usize>,
    weights: Vec<f64>,
}

impl Ant {
    /// Creates an ant at `start` in an instance of `num_cities` cities.
    pub fn new(start: usize, num_cities: usize) -> AcoResult<Self> {
        if start >= num_cities {
            return Err(AcoError::CityOutOfRange {
                city: start,
                num_cities,
            });
        }
        let mut visited = vec![false; num_cities];
        visited[start] = true;
        let mut sequence = Vec::with_capacity(num_cities);
        sequence.push(start);
        Ok(Self {
            current: start,
            sequence,
            visited,
            length: 0.0,
            candidates: Vec::with_capacity(num_cities),
            weights: Vec::with_capacity(num_cities),
        })
    }

    /// Returns the ant to a one-city tour at `start` without reallocating.
    pub fn reset(&mut self, start: usize) -> AcoResult<()> {
        if start >= self.visited.len() {
            return Err(AcoError::CityOutOfRange {
                city: start,
                num_cities: self.visited.len(),
            });
        }
        self.visited.fill(false);
        self.visited[start] = true;
        self.sequence.clear();
        self.sequence.push(start);
        self.current = start;
        self.length = 0.0;
        Ok(())
    }

    /// Chooses the next city by the pheromone/distance transition rule.
    ///
    /// Returns `None` once every city has been visited.
    pub fn select_next_city<R: Rng + ?Sized>(
        &mut self,
        distances: &DistanceMatrix,
        pheromones: &PheromoneField,
        alpha: f64,
        beta: f64,
        rng: &mut R,
    ) -> Option<usize> {
        self.candidates.clear();
        self.weights.clear();

        let row = distances.row(self.current);
        let mut total = 0.0;
        for (city, &seen) in self.visited.iter().enumerate() {
            if seen {
                continue;
            }
            let tau = pheromones.get(self.current, city);
            let d = row[city].max(MIN_DISTANCE);
            let w = tau.powf(alpha) * (1.0 / d).powf(beta);
            self.candidates.push(city);
            self.weights.push(w);
            total += w;
        }

        if self.candidates.is_empty() {
            return None;
        }

        if !(total > 0.0 && total.is_finite()) {
            let pick = rng.random_range(0..self.candidates.len());
            return Some(self.candidates[pick]);
        }

        let u: f64 = rng.random();
        let mut cumulative = 0.0;
        for (&city, &w) in self.candidates.iter().zip(&self.weights) {
            cumulative += w / total;
            if u <= cumulative {
                return Some(city);
            }
        }
        // Rounding left the cumulative sum just below u.
        self.candidates.last().copied()
    }

    /// Moves to `city`, adding the edge length from the current city.
    pub fn visit_city(&mut self, city: usize, distances: &DistanceMatrix) -> AcoResult<()> {
        if city >= self.visited.len() {
            return Err(AcoError::CityOutOfRange {
                city,
                num_cities: self.visited.len(),
            });
        }
        if self.visited[city] {
            return Err(AcoError::CityAlreadyVisited { city });
        }
        self.length += distances.get(self.current, city);
        self.current = city;
        self.visited[city] = true;
        self.sequence.push(city);
        Ok(())
    }

    /// Returns `true` once every city is in the sequence.
    pub fn has_visited_all(&self) -> bool {
        self.sequence.len() == self.visited.len()
    }

    /// Closes the loop and returns the finished tour.
    pub fn complete_tour(&self, distances: &DistanceMatrix) -> AcoResult<Tour> {
        if !self.has_visited_all() {
            return Err(AcoError::IncompleteTour {
                visited: self.sequence.len(),
                total: self.visited.len(),
            });
        }
        let closing = distances.get(self.current, self.sequence[0]);
        Ok(Tour::new(self.sequence.clone(), self.length + closing))
    }

    /// Recomputes the path length from the sequence.
    ///
    /// Includes the closing edge only if the tour is complete.
    pub fn tour_length(&self, distances: &DistanceMatrix) -> f64 {
        let mut length: f64 = self
            .sequence
            .windows(2)
            .map(|w| distances.get(w[0], w[1]))
            .sum();
        if self.has_visited_all() {
            if let (Some(&last), Some(&first)) = (self.sequence.last(), self.sequence.first()) {
                length += distances.get(last, first);
            }
        }
        length
    }

    /// City the ant is currently at.
    pub fn current_city(&self) -> usize {
        self.current
    }

    /// Cities visited so far, in order.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Returns `true` if `city` has been visited.
    pub fn is_visited(&self, city: usize) -> bool {
        self.visited.get(city).copied().unwrap_or(false)
    }

    /// Accumulated length of the open path.
    pub fn path_length(&self) -> f64 {
        self.length
    }
}
