//! Ant colony optimization loop.
//!
//! - [`Ant`] — Probabilistic tour construction
//! - [`ColonyConfig`] — Tunables, deposit and local search policies
//! - [`Colony`] — Iteration loop, best tracking, pheromone update
//! - [`ProgressObserver`] — Periodic progress hook

mod ant;
mod config;
mod progress;
mod runner;

pub use ant::Ant;
pub use config::{ColonyConfig, LocalSearchMode, Parallelism, PheromoneMode};
pub use progress::{ProgressObserver, StopCondition};
pub use runner::Colony;
