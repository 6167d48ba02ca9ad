//! Error types for colony construction and tour building.

use thiserror::Error;

/// Result type alias for fallible operations in this crate.
pub type AcoResult<T> = Result<T, AcoError>;

/// Errors raised by the optimization core.
///
/// Agent errors (`CityAlreadyVisited`, `IncompleteTour`) indicate a bug in
/// the caller driving the ant, not a runtime condition. Configuration errors
/// are reported when a colony is built or reconfigured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// An ant was asked to visit a city it has already visited.
    #[error("city {city} already visited")]
    CityAlreadyVisited {
        /// City index.
        city: usize,
    },

    /// A tour was completed before every city was visited.
    #[error("tour is not complete: visited {visited} of {total} cities")]
    IncompleteTour {
        /// Cities visited so far.
        visited: usize,
        /// Cities in the instance.
        total: usize,
    },

    /// A city index outside `[0, num_cities)`.
    #[error("city {city} out of range for instance with {num_cities} cities")]
    CityOutOfRange {
        /// Offending index.
        city: usize,
        /// Number of cities in the instance.
        num_cities: usize,
    },

    /// A problem instance with no cities.
    #[error("problem instance has no cities")]
    EmptyInstance,

    /// An explicit distance matrix does not match the city count.
    #[error("distance matrix has size {actual}, expected {expected}")]
    DimensionMismatch {
        /// Number of cities.
        expected: usize,
        /// Matrix dimension.
        actual: usize,
    },

    /// A colony parameter outside its valid range.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value, formatted.
        value: String,
        /// Valid range description.
        reason: &'static str,
    },

    /// A mode name that does not match any variant.
    #[error("unknown {kind} '{value}'")]
    UnknownMode {
        /// Which mode was being parsed.
        kind: &'static str,
        /// Rejected input.
        value: String,
    },
}

impl AcoError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
