//! Dense distance matrix.

use crate::models::City;

/// Precomputed pairwise distances between `n` cities, row-major.
///
/// # Examples
///
/// ```
/// use u_aco::models::City;
/// use u_aco::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_cities(&[
///     City::new(0, 0.0, 0.0),
///     City::new(1, 3.0, 4.0),
///     City::new(2, 6.0, 8.0),
/// ]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.row(2), &[10.0, 5.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// An all-zero matrix for `size` cities.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Euclidean distances between `cities`, indexed by position.
    pub fn from_cities(cities: &[City]) -> Self {
        let size = cities.len();
        let data = cities
            .iter()
            .flat_map(|a| cities.iter().map(move |b| a.distance_to(b)))
            .collect();
        Self { data, size }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// Returns `None` unless every row has one entry per row.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.concat(),
            size,
        })
    }

    /// Distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Like [`get`](Self::get), but `None` for out-of-range indices.
    pub fn checked_get(&self, from: usize, to: usize) -> Option<f64> {
        if from < self.size && to < self.size {
            Some(self.data[from * self.size + to])
        } else {
            None
        }
    }

    /// Distances from `from` to every city.
    #[inline]
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Overwrites one directed entry.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.size
    }

    /// `true` if `get(i, j)` and `get(j, i)` differ by at most `tol`
    /// everywhere.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> DistanceMatrix {
        DistanceMatrix::from_cities(&[
            City::new(0, 0.0, 0.0),
            City::new(1, 3.0, 4.0),
            City::new(2, 0.0, 8.0),
        ])
    }

    #[test]
    fn test_from_cities() {
        let dm = triangle();
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert_eq!(dm.get(1, 1), 0.0);
        assert!(dm.is_symmetric(0.0));
    }

    #[test]
    fn test_from_rows() {
        let dm = DistanceMatrix::from_rows(&[vec![0.0, 7.0], vec![7.0, 0.0]]).expect("square");
        assert_eq!(dm.get(1, 0), 7.0);
        assert_eq!(dm.row(0), &[0.0, 7.0]);
    }

    #[test]
    fn test_from_rows_ragged() {
        assert!(DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]).is_none());
        assert!(DistanceMatrix::from_rows(&[vec![0.0, 1.0]]).is_none());
    }

    #[test]
    fn test_checked_get() {
        let dm = triangle();
        assert_eq!(dm.checked_get(0, 1), Some(dm.get(0, 1)));
        assert_eq!(dm.checked_get(3, 0), None);
        assert_eq!(dm.checked_get(0, 3), None);
    }

    #[test]
    fn test_set_breaks_symmetry() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert!(!dm.is_symmetric(1e-10));
        assert!(dm.is_symmetric(5.0));
    }

    #[test]
    fn test_empty() {
        let dm = DistanceMatrix::from_cities(&[]);
        assert_eq!(dm.size(), 0);
        assert!(dm.is_symmetric(0.0));
    }
}
