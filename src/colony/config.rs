//! Colony configuration and strategy selectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AcoError, AcoResult};

/// Which tours deposit pheromone after evaporation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PheromoneMode {
    /// Every ant's tour deposits `Q / length`.
    #[default]
    All,
    /// Only the shortest tour of the iteration deposits.
    BestIteration,
    /// Only the best tour found so far deposits.
    BestSoFar,
    /// The `k` shortest tours deposit with weight `k - rank`.
    Rank,
}

impl PheromoneMode {
    /// Name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::BestIteration => "best-iteration",
            Self::BestSoFar => "best-so-far",
            Self::Rank => "rank",
        }
    }
}

impl fmt::Display for PheromoneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PheromoneMode {
    type Err = AcoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "best-iteration" => Ok(Self::BestIteration),
            "best-so-far" => Ok(Self::BestSoFar),
            "rank" => Ok(Self::Rank),
            other => Err(AcoError::UnknownMode {
                kind: "pheromone mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Which tours local search is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalSearchMode {
    /// Never.
    None,
    /// The iteration's best tour, before it is compared with the global best.
    #[default]
    Best,
    /// Every ant's tour, before pheromone deposit.
    All,
}

impl LocalSearchMode {
    /// Name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Best => "best",
            Self::All => "all",
        }
    }
}

impl fmt::Display for LocalSearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocalSearchMode {
    type Err = AcoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "best" => Ok(Self::Best),
            "all" => Ok(Self::All),
            other => Err(AcoError::UnknownMode {
                kind: "local search mode",
                value: other.to_string(),
            }),
        }
    }
}

/// How ant construction is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    /// Everything on the calling thread.
    Serial,
    /// Rayon's global pool.
    Auto,
    /// A dedicated pool with this many threads.
    Threads(usize),
}

/// Tunable parameters of a [`Colony`](super::Colony).
///
/// Defaults follow the classic Ant System settings (α = 1, β = 2, ρ = 0.5,
/// Q = 100) with 20 ants, all-ants deposit and no local search.
///
/// # Examples
///
/// ```
/// use u_aco::colony::{ColonyConfig, PheromoneMode};
///
/// let config = ColonyConfig::default()
///     .with_num_ants(30)
///     .with_pheromone_mode(PheromoneMode::Rank)
///     .with_rank_size(5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.effective_rank_size(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Ants per iteration.
    pub num_ants: usize,
    /// Pheromone exponent (α).
    pub alpha: f64,
    /// Distance heuristic exponent (β).
    pub beta: f64,
    /// Evaporation rate (ρ).
    pub rho: f64,
    /// Deposit scale (Q).
    pub q: f64,
    /// Start ant `i` at city `i mod n` instead of a random city.
    pub distinct_start_cities: bool,
    /// Allow multi-threaded construction.
    pub parallel: bool,
    /// Thread count: 0 = automatic, 1 = serial.
    pub num_threads: usize,
    /// Enable local search.
    pub local_search: bool,
    /// Follow 2-opt with 3-opt.
    pub use_three_opt: bool,
    /// Which tours local search is applied to.
    pub local_search_mode: LocalSearchMode,
    /// Iterations without improvement before a convergence run stops.
    pub convergence_threshold: usize,
    /// Progress is reported every this many iterations.
    pub callback_interval: usize,
    /// Deposit strategy.
    pub pheromone_mode: PheromoneMode,
    /// Tours that deposit in rank mode; `None` means half the ants.
    pub rank_size: Option<usize>,
    /// Extra deposit from the best tour so far.
    pub elitist: bool,
    /// Weight of the elitist deposit; `None` means the number of ants.
    pub elitist_weight: Option<f64>,
    /// Clamp the field into `[min, max]` after each deposit.
    pub pheromone_bounds: Option<(f64, f64)>,
    /// Master seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            num_ants: 20,
            alpha: 1.0,
            beta: 2.0,
            rho: 0.5,
            q: 100.0,
            distinct_start_cities: false,
            parallel: true,
            num_threads: 0,
            local_search: false,
            use_three_opt: true,
            local_search_mode: LocalSearchMode::Best,
            convergence_threshold: 200,
            callback_interval: 10,
            pheromone_mode: PheromoneMode::All,
            rank_size: None,
            elitist: false,
            elitist_weight: None,
            pheromone_bounds: None,
            seed: None,
        }
    }
}

impl ColonyConfig {
    /// Set number of ants
    #[must_use]
    pub fn with_num_ants(mut self, num_ants: usize) -> Self {
        self.num_ants = num_ants;
        self
    }

    /// Set pheromone importance (α)
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set heuristic importance (β)
    #[must_use]
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set evaporation rate (ρ)
    #[must_use]
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Set deposit scale (Q)
    #[must_use]
    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    /// Start ants at distinct cities
    #[must_use]
    pub fn with_distinct_start_cities(mut self, distinct: bool) -> Self {
        self.distinct_start_cities = distinct;
        self
    }

    /// Enable or disable parallel construction
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set thread count (0 = auto, 1 = serial)
    #[must_use]
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Enable local search
    #[must_use]
    pub fn with_local_search(mut self, enabled: bool) -> Self {
        self.local_search = enabled;
        self
    }

    /// Follow 2-opt with 3-opt
    #[must_use]
    pub fn with_three_opt(mut self, enabled: bool) -> Self {
        self.use_three_opt = enabled;
        self
    }

    /// Set which tours local search is applied to
    #[must_use]
    pub fn with_local_search_mode(mut self, mode: LocalSearchMode) -> Self {
        self.local_search_mode = mode;
        self
    }

    /// Set the stagnation limit for convergence runs
    #[must_use]
    pub fn with_convergence_threshold(mut self, iterations: usize) -> Self {
        self.convergence_threshold = iterations;
        self
    }

    /// Set the progress reporting interval
    #[must_use]
    pub fn with_callback_interval(mut self, iterations: usize) -> Self {
        self.callback_interval = iterations;
        self
    }

    /// Set the deposit strategy
    #[must_use]
    pub fn with_pheromone_mode(mut self, mode: PheromoneMode) -> Self {
        self.pheromone_mode = mode;
        self
    }

    /// Set the number of ranked tours that deposit
    #[must_use]
    pub fn with_rank_size(mut self, k: usize) -> Self {
        self.rank_size = Some(k);
        self
    }

    /// Enable the elitist deposit
    #[must_use]
    pub fn with_elitist(mut self, enabled: bool) -> Self {
        self.elitist = enabled;
        self
    }

    /// Set the elitist weight
    #[must_use]
    pub fn with_elitist_weight(mut self, weight: f64) -> Self {
        self.elitist_weight = Some(weight);
        self
    }

    /// Clamp pheromone into `[min, max]` after each update
    #[must_use]
    pub fn with_pheromone_bounds(mut self, min: f64, max: f64) -> Self {
        self.pheromone_bounds = Some((min, max));
        self
    }

    /// Set random seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every parameter against its valid range.
    pub fn validate(&self) -> AcoResult<()> {
        if self.num_ants == 0 {
            return Err(AcoError::invalid("num_ants", self.num_ants, "must be at least 1"));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(AcoError::invalid("alpha", self.alpha, "must be finite and >= 0"));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(AcoError::invalid("beta", self.beta, "must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.rho) {
            return Err(AcoError::invalid("rho", self.rho, "must be in [0, 1]"));
        }
        if !(self.q.is_finite() && self.q > 0.0) {
            return Err(AcoError::invalid("q", self.q, "must be finite and > 0"));
        }
        if self.convergence_threshold == 0 {
            return Err(AcoError::invalid(
                "convergence_threshold",
                self.convergence_threshold,
                "must be at least 1",
            ));
        }
        if self.callback_interval == 0 {
            return Err(AcoError::invalid(
                "callback_interval",
                self.callback_interval,
                "must be at least 1",
            ));
        }
        if self.rank_size == Some(0) {
            return Err(AcoError::invalid("rank_size", 0, "must be at least 1"));
        }
        if let Some(w) = self.elitist_weight {
            if !(w.is_finite() && w >= 0.0) {
                return Err(AcoError::invalid("elitist_weight", w, "must be finite and >= 0"));
            }
        }
        if let Some((min, max)) = self.pheromone_bounds {
            if !(min >= 0.0 && min <= max) {
                return Err(AcoError::invalid(
                    "pheromone_bounds",
                    format!("({min}, {max})"),
                    "must satisfy 0 <= min <= max",
                ));
            }
        }
        Ok(())
    }

    /// Scheduling implied by `parallel` and `num_threads`.
    pub fn parallelism(&self) -> Parallelism {
        match (self.parallel, self.num_threads) {
            (false, _) | (true, 1) => Parallelism::Serial,
            (true, 0) => Parallelism::Auto,
            (true, n) => Parallelism::Threads(n),
        }
    }

    /// Whether local search runs at all.
    pub fn local_search_enabled(&self) -> bool {
        self.local_search && self.local_search_mode != LocalSearchMode::None
    }

    /// Rank size with the default applied: half the ants, at least one.
    pub fn effective_rank_size(&self) -> usize {
        self.rank_size.unwrap_or(self.num_ants / 2).max(1)
    }

    /// Elitist weight with the default applied: the number of ants.
    pub fn effective_elitist_weight(&self) -> f64 {
        self.elitist_weight.unwrap_or(self.num_ants as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = ColonyConfig::default();
        assert_eq!(c.num_ants, 20);
        assert_eq!(c.alpha, 1.0);
        assert_eq!(c.beta, 2.0);
        assert_eq!(c.rho, 0.5);
        assert_eq!(c.q, 100.0);
        assert_eq!(c.convergence_threshold, 200);
        assert_eq!(c.callback_interval, 10);
        assert_eq!(c.pheromone_mode, PheromoneMode::All);
        assert_eq!(c.local_search_mode, LocalSearchMode::Best);
        assert!(!c.local_search_enabled());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_effective_defaults() {
        let c = ColonyConfig::default().with_num_ants(9);
        assert_eq!(c.effective_rank_size(), 4);
        assert_eq!(c.effective_elitist_weight(), 9.0);

        let single = ColonyConfig::default().with_num_ants(1);
        assert_eq!(single.effective_rank_size(), 1);
    }

    #[test]
    fn test_parallelism() {
        let c = ColonyConfig::default();
        assert_eq!(c.parallelism(), Parallelism::Auto);
        assert_eq!(c.clone().with_num_threads(1).parallelism(), Parallelism::Serial);
        assert_eq!(c.clone().with_num_threads(4).parallelism(), Parallelism::Threads(4));
        assert_eq!(
            c.with_parallel(false).with_num_threads(4).parallelism(),
            Parallelism::Serial
        );
    }

    #[test]
    fn test_validate_rejects() {
        let base = ColonyConfig::default();
        assert!(base.clone().with_num_ants(0).validate().is_err());
        assert!(base.clone().with_alpha(-0.1).validate().is_err());
        assert!(base.clone().with_beta(f64::NAN).validate().is_err());
        assert!(base.clone().with_rho(1.5).validate().is_err());
        assert!(base.clone().with_rho(-0.01).validate().is_err());
        assert!(base.clone().with_q(0.0).validate().is_err());
        assert!(base.clone().with_convergence_threshold(0).validate().is_err());
        assert!(base.clone().with_callback_interval(0).validate().is_err());
        assert!(base.clone().with_rank_size(0).validate().is_err());
        assert!(base.clone().with_elitist_weight(-1.0).validate().is_err());
        assert!(base.with_pheromone_bounds(2.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_validate_accepts_extremes() {
        let c = ColonyConfig::default()
            .with_alpha(0.0)
            .with_beta(0.0)
            .with_rho(1.0)
            .with_num_ants(1);
        assert!(c.validate().is_ok());
        assert!(c.with_rho(0.0).validate().is_ok());
    }

    #[test]
    fn test_mode_names() {
        for mode in [
            PheromoneMode::All,
            PheromoneMode::BestIteration,
            PheromoneMode::BestSoFar,
            PheromoneMode::Rank,
        ] {
            assert_eq!(mode.to_string().parse::<PheromoneMode>(), Ok(mode));
        }
        for mode in [LocalSearchMode::None, LocalSearchMode::Best, LocalSearchMode::All] {
            assert_eq!(mode.to_string().parse::<LocalSearchMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_unknown_mode() {
        assert_eq!(
            "best-ever".parse::<PheromoneMode>(),
            Err(AcoError::UnknownMode {
                kind: "pheromone mode",
                value: "best-ever".to_string()
            })
        );
        assert!("sometimes".parse::<LocalSearchMode>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PheromoneMode::BestSoFar).expect("serialize");
        assert_eq!(json, "\"best-so-far\"");
        let parsed: ColonyConfig =
            serde_json::from_str(r#"{"num_ants": 8, "pheromone_mode": "rank"}"#).expect("parse");
        assert_eq!(parsed.num_ants, 8);
        assert_eq!(parsed.pheromone_mode, PheromoneMode::Rank);
        assert_eq!(parsed.rho, 0.5);
    }
}
