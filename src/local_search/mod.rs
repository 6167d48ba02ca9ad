//! Local search operators for improving closed tours.
//!
//! - [`two_opt`] — Segment reversal, first improvement, O(n²) per sweep
//! - [`three_opt`] — Three-edge reconnection, best improvement, O(n³) per sweep
//! - [`improve`] — 2-opt to convergence, then optionally 3-opt
//!
//! All operators mutate the [`Tour`](crate::models::Tour) in place and
//! never increase its length.

mod improve;
mod three_opt;
mod two_opt;

pub use improve::{improve, tour_length};
pub use three_opt::three_opt;
pub use two_opt::two_opt;

/// Moves must shorten the tour by more than this to be applied.
pub(crate) const IMPROVEMENT_EPSILON: f64 = 1e-9;
