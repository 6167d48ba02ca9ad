//! Tour type.

use serde::{Deserialize, Serialize};

/// A closed tour: an ordered sequence of city indices plus its total length.
///
/// The closing edge from the last city back to the first is implicit and
/// included in `length`.
///
/// # Examples
///
/// ```
/// use u_aco::models::Tour;
///
/// let tour = Tour::new(vec![0, 2, 1], 12.0);
/// assert_eq!(tour.len(), 3);
/// assert!(tour.validate(3));
/// assert!(!tour.validate(4));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    sequence: Vec<usize>,
    length: f64,
}

impl Tour {
    /// Creates a tour from a sequence and its precomputed length.
    pub fn new(sequence: Vec<usize>, length: f64) -> Self {
        Self { sequence, length }
    }

    /// An empty placeholder tour with infinite length.
    ///
    /// Any real tour compares strictly shorter.
    pub fn empty() -> Self {
        Self {
            sequence: Vec::new(),
            length: f64::INFINITY,
        }
    }

    /// Replaces the sequence and length.
    pub fn set(&mut self, sequence: Vec<usize>, length: f64) {
        self.sequence = sequence;
        self.length = length;
    }

    /// The visiting order.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Total length including the closing edge.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of cities in the tour.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns `true` if the tour holds no cities.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Iterates the tour's edges, including the closing edge.
    ///
    /// A single-city tour yields one self-loop `(c, c)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.sequence.len();
        (0..n).map(move |i| (self.sequence[i], self.sequence[(i + 1) % n]))
    }

    /// Returns `true` if the sequence is a permutation of `0..num_cities`.
    pub fn validate(&self, num_cities: usize) -> bool {
        if self.sequence.is_empty() || self.sequence.len() != num_cities {
            return false;
        }
        let mut seen = vec![false; num_cities];
        for &city in &self.sequence {
            if city >= num_cities || seen[city] {
                return false;
            }
            seen[city] = true;
        }
        true
    }
}

impl Default for Tour {
    fn default() -> Self {
        Self::empty()
    }
}
