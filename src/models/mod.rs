//! Domain model types for the traveling salesperson problem.
//!
//! Provides the core abstractions: cities with coordinates, closed tours,
//! and the immutable problem instance that ties cities to distances.

mod city;
mod problem;
mod tour;

pub use city::City;
pub use problem::ProblemInstance;
pub use tour::Tour;
