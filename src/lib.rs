//! # u-aco
//!
//! Ant colony optimization for the symmetric traveling salesperson problem,
//! with 2-opt and 3-opt tour improvement.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (City, Tour, ProblemInstance)
//! - [`distance`] — Precomputed distance matrix
//! - [`constructive`] — Nearest-neighbor tour construction
//! - [`pheromone`] — Symmetric pheromone field with atomic deposits
//! - [`local_search`] — Local search operators (2-opt, 3-opt)
//! - [`colony`] — Ants, configuration and the colony loop
//! - [`random`] — Seeded random number generation
//! - [`error`] — Error type
//!
//! ## Example
//!
//! ```
//! use u_aco::colony::{Colony, ColonyConfig, StopCondition};
//! use u_aco::models::{City, ProblemInstance};
//!
//! let cities = vec![
//!     City::new(0, 0.0, 0.0),
//!     City::new(1, 3.0, 0.0),
//!     City::new(2, 0.0, 4.0),
//! ];
//! let instance = ProblemInstance::new(cities).unwrap();
//! let config = ColonyConfig::default().with_num_ants(20).with_seed(1);
//! let mut colony = Colony::with_config(instance, config).unwrap();
//!
//! let best = colony.solve(StopCondition::Iterations(50), None).unwrap();
//! assert!((best.length() - 12.0).abs() < 1e-9);
//! ```

pub mod colony;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod local_search;
pub mod models;
pub mod pheromone;
pub mod random;

pub use error::{AcoError, AcoResult};
