//! Distance matrices.
//!
//! Provides a dense distance matrix with O(1) lookups.

mod matrix;

pub use matrix::DistanceMatrix;
