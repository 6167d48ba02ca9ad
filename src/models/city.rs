//! City type.

use serde::{Deserialize, Serialize};

/// A city in a TSP instance.
///
/// The `id` is the loader's identifier and is carried through unchanged;
/// solvers address cities by their position in the instance instead.
///
/// # Examples
///
/// ```
/// use u_aco::models::City;
///
/// let a = City::new(1, 0.0, 0.0);
/// let b = City::new(2, 3.0, 4.0);
/// assert_eq!(a.id(), 1);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct City {
    id: usize,
    x: f64,
    y: f64,
}

impl City {
    /// Creates a new city.
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Identifier assigned by the loader.
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another city.
    pub fn distance_to(&self, other: &City) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
