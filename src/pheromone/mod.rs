//! Pheromone state shared by the colony's ants.

mod field;

pub use field::PheromoneField;
