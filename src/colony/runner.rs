//! The colony: iteration loop, local search policy and pheromone update.
//!
//! # Iteration
//!
//! 1. Every ant builds a tour (in parallel when enabled).
//! 2. Local search is applied per [`LocalSearchMode`].
//! 3. The iteration best is found; it replaces the global best only if
//!    strictly shorter.
//! 4. The iteration best length is appended to the convergence history.
//! 5. The field evaporates, then tours deposit per [`PheromoneMode`], plus the
//!    optional elitist deposit, then the optional clamp.
//!
//! # Reference
//!
//! Dorigo, M. & Stützle, T. (2004). *Ant Colony Optimization*, MIT Press,
//! chapter 3.

use std::fmt;

use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, trace, warn};

use super::ant::Ant;
use super::config::{ColonyConfig, LocalSearchMode, Parallelism, PheromoneMode};
use super::progress::{ProgressObserver, StopCondition};
use crate::distance::DistanceMatrix;
use crate::error::{AcoError, AcoResult};
use crate::local_search::improve;
use crate::models::{ProblemInstance, Tour};
use crate::pheromone::PheromoneField;
use crate::random::{create_rng, draw_seeds, master_rng};

/// Below this many ants everything runs on the calling thread.
const PARALLEL_THRESHOLD: usize = 8;

/// An ant colony solving one TSP instance.
///
/// # Examples
///
/// ```
/// use u_aco::colony::{Colony, ColonyConfig, StopCondition};
/// use u_aco::models::{City, ProblemInstance};
///
/// let instance = ProblemInstance::new(vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 1.0, 0.0),
///     City::new(2, 1.0, 1.0),
///     City::new(3, 0.0, 1.0),
/// ]).unwrap();
///
/// let config = ColonyConfig::default().with_num_ants(10).with_seed(42);
/// let mut colony = Colony::with_config(instance, config).unwrap();
/// let best = colony.solve(StopCondition::Iterations(50), None).unwrap();
///
/// assert!(best.validate(4));
/// assert!(best.length() <= 4.1);
/// assert_eq!(colony.convergence_history().len(), 50);
/// ```
pub struct Colony {
    instance: ProblemInstance,
    config: ColonyConfig,
    pheromones: PheromoneField,
    ants: Vec<Ant>,
    tours: Vec<Tour>,
    best: Tour,
    history: Vec<f64>,
    rng: StdRng,
    pool: Option<ThreadPool>,
    observer: Option<Box<dyn ProgressObserver + Send>>,
}

impl Colony {
    /// Creates a colony with the core Ant System parameters and defaults for
    /// everything else.
    pub fn new(
        instance: ProblemInstance,
        num_ants: usize,
        alpha: f64,
        beta: f64,
        rho: f64,
        q: f64,
        distinct_start_cities: bool,
    ) -> AcoResult<Self> {
        let config = ColonyConfig {
            num_ants,
            alpha,
            beta,
            rho,
            q,
            distinct_start_cities,
            ..ColonyConfig::default()
        };
        Self::with_config(instance, config)
    }

    /// Creates a colony from a full configuration.
    pub fn with_config(instance: ProblemInstance, config: ColonyConfig) -> AcoResult<Self> {
        config.validate()?;
        let n = instance.num_cities();
        if n == 0 {
            return Err(AcoError::EmptyInstance);
        }

        let ants = (0..config.num_ants)
            .map(|i| Ant::new(i % n, n))
            .collect::<AcoResult<Vec<_>>>()?;

        Ok(Self {
            pheromones: PheromoneField::new(n, 1.0),
            ants,
            tours: Vec::with_capacity(config.num_ants),
            best: Tour::empty(),
            history: Vec::new(),
            rng: master_rng(config.seed),
            pool: build_pool(config.parallelism()),
            observer: None,
            instance,
            config,
        })
    }

    /// Resets the field to τ₀ = ants / nearest-neighbor length, clears the
    /// history and forgets the best tour.
    ///
    /// Falls back to τ₀ = 1 when the nearest-neighbor tour has zero length.
    pub fn initialize(&mut self) {
        let nn_length = self.instance.nearest_neighbor_tour_length(0);
        let tau0 = if nn_length > 0.0 {
            self.config.num_ants as f64 / nn_length
        } else {
            1.0
        };
        self.pheromones.fill(tau0);
        if let Some((min, max)) = self.config.pheromone_bounds {
            self.pheromones.set_bounds(min, max);
        }
        if let Some(seed) = self.config.seed {
            self.rng = create_rng(seed);
        }
        self.tours.clear();
        self.history.clear();
        self.best = Tour::empty();

        debug!(
            cities = self.instance.num_cities(),
            ants = self.config.num_ants,
            nn_length,
            tau0,
            pheromone_mode = %self.config.pheromone_mode,
            local_search = self.config.local_search_enabled(),
            "colony initialized"
        );
    }

    /// Lets every ant build a complete tour from the current field.
    pub fn construct_solutions(&mut self) -> AcoResult<()> {
        let n = self.instance.num_cities();
        let num_ants = self.config.num_ants;

        let starts: Vec<usize> = if self.config.distinct_start_cities {
            (0..num_ants).map(|i| i % n).collect()
        } else {
            (0..num_ants).map(|_| self.rng.random_range(0..n)).collect()
        };
        let seeds = draw_seeds(&mut self.rng, num_ants);

        let parallel = self.use_parallel();
        let distances = self.instance.distances();
        let pheromones = &self.pheromones;
        let (alpha, beta) = (self.config.alpha, self.config.beta);
        let ants = &mut self.ants;

        let tours: AcoResult<Vec<Tour>> = if parallel {
            run_in(self.pool.as_ref(), || {
                ants.par_iter_mut()
                    .zip(starts.par_iter().zip(seeds.par_iter()))
                    .map(|(ant, (&start, &seed))| {
                        build_tour(ant, start, seed, distances, pheromones, alpha, beta)
                    })
                    .collect()
            })
        } else {
            ants.iter_mut()
                .zip(starts.iter().zip(&seeds))
                .map(|(ant, (&start, &seed))| {
                    build_tour(ant, start, seed, distances, pheromones, alpha, beta)
                })
                .collect()
        };

        self.tours = tours?;
        Ok(())
    }

    /// Applies local search to this iteration's tours per the configured mode.
    pub fn apply_local_search(&mut self) {
        if !self.config.local_search_enabled() || self.tours.is_empty() {
            return;
        }
        let distances = self.instance.distances();
        let use_three_opt = self.config.use_three_opt;

        match self.config.local_search_mode {
            LocalSearchMode::None => {}
            LocalSearchMode::Best => {
                if let Some(i) = best_index(&self.tours, false) {
                    improve(&mut self.tours[i], distances, use_three_opt);
                }
            }
            LocalSearchMode::All => {
                let parallel = self.use_parallel();
                let tours = &mut self.tours;
                if parallel {
                    run_in(self.pool.as_ref(), || {
                        tours.par_iter_mut().for_each(|t| {
                            improve(t, distances, use_three_opt);
                        })
                    });
                } else {
                    for t in tours.iter_mut() {
                        improve(t, distances, use_three_opt);
                    }
                }
            }
        }
    }

    /// Evaporates the field, then deposits from the tours selected by the
    /// pheromone mode and, if enabled, the elitist tour.
    ///
    /// Each depositing tour adds `weight · Q / length` to every edge it uses.
    /// Tours of zero length deposit nothing.
    pub fn update_pheromones(&mut self) {
        self.pheromones.evaporate(self.config.rho);

        let q = self.config.q;
        let mut deposits: Vec<(&Tour, f64)> = Vec::new();
        match self.config.pheromone_mode {
            PheromoneMode::All => deposits.extend(self.tours.iter().map(|t| (t, 1.0))),
            PheromoneMode::BestIteration => {
                if let Some(i) = best_index(&self.tours, false) {
                    deposits.push((&self.tours[i], 1.0));
                }
            }
            PheromoneMode::BestSoFar => {
                if !self.best.is_empty() {
                    deposits.push((&self.best, 1.0));
                }
            }
            PheromoneMode::Rank => {
                let mut order: Vec<usize> = (0..self.tours.len()).collect();
                order.sort_by(|&a, &b| {
                    self.tours[a]
                        .length()
                        .total_cmp(&self.tours[b].length())
                        .then(a.cmp(&b))
                });
                let k = self.config.effective_rank_size().min(order.len());
                for (rank, &i) in order.iter().take(k).enumerate() {
                    deposits.push((&self.tours[i], (k - rank) as f64));
                }
            }
        }
        if self.config.elitist && !self.best.is_empty() {
            deposits.push((&self.best, self.config.effective_elitist_weight()));
        }

        let field = &self.pheromones;
        let deposit = |&(tour, weight): &(&Tour, f64)| {
            let length = tour.length();
            if !(length > 0.0 && length.is_finite()) {
                return;
            }
            let amount = weight * q / length;
            for (a, b) in tour.edges() {
                field.deposit(a, b, amount);
            }
        };

        if self.use_parallel() && deposits.len() >= PARALLEL_THRESHOLD {
            run_in(self.pool.as_ref(), || deposits.par_iter().for_each(deposit));
        } else {
            deposits.iter().for_each(deposit);
        }

        if let Some((min, max)) = self.config.pheromone_bounds {
            self.pheromones.clamp(min, max);
        }
    }

    /// Runs one full iteration and returns the iteration-best length.
    pub fn run_iteration(&mut self) -> AcoResult<f64> {
        self.construct_solutions()?;
        self.apply_local_search();

        let parallel = self.use_parallel();
        let tours = &self.tours;
        let best_idx = if parallel {
            run_in(self.pool.as_ref(), || best_index(tours, true))
        } else {
            best_index(tours, false)
        };

        let iteration_best = match best_idx {
            Some(i) => {
                let candidate = &self.tours[i];
                if candidate.length() < self.best.length() {
                    debug!(
                        previous = self.best.length(),
                        best = candidate.length(),
                        "new global best"
                    );
                    self.best = candidate.clone();
                }
                candidate.length()
            }
            None => f64::INFINITY,
        };

        self.history.push(iteration_best);
        self.update_pheromones();
        Ok(iteration_best)
    }

    /// Runs the colony until `stop` is met and returns the best tour found.
    ///
    /// Progress goes to `observer` if given, otherwise to the observer set
    /// with [`set_progress_observer`](Self::set_progress_observer), every
    /// `callback_interval` iterations. With `StopCondition::Iterations(0)`
    /// no iteration runs and the returned tour is empty.
    pub fn solve(
        &mut self,
        stop: StopCondition,
        mut observer: Option<&mut dyn ProgressObserver>,
    ) -> AcoResult<Tour> {
        self.initialize();

        let threshold = self.config.convergence_threshold;
        let interval = self.config.callback_interval;
        let mut iteration = 0usize;
        let mut stale = 0usize;
        let mut last_best = f64::INFINITY;

        loop {
            match stop {
                StopCondition::Iterations(max) if iteration >= max => break,
                StopCondition::Convergence if stale >= threshold => break,
                _ => {}
            }

            let iteration_best = self.run_iteration()?;
            iteration += 1;

            let best = self.best.length();
            if best < last_best {
                stale = 0;
                last_best = best;
            } else {
                stale += 1;
            }
            trace!(iteration, iteration_best, best, stale, "iteration complete");

            if iteration % interval == 0 {
                let target: Option<&mut dyn ProgressObserver> = match observer.as_deref_mut() {
                    Some(o) => Some(o),
                    None => self
                        .observer
                        .as_deref_mut()
                        .map(|o| o as &mut dyn ProgressObserver),
                };
                if let Some(o) = target {
                    o.on_progress(iteration, best, self.best.sequence(), &self.history);
                }
            }
        }

        info!(
            iterations = iteration,
            best = self.best.length(),
            converged = matches!(stop, StopCondition::Convergence),
            "solve finished"
        );
        Ok(self.best.clone())
    }

    fn use_parallel(&self) -> bool {
        self.config.parallelism() != Parallelism::Serial
            && self.config.num_ants >= PARALLEL_THRESHOLD
    }

    fn sync_pool(&mut self, before: Parallelism) {
        let after = self.config.parallelism();
        if after != before {
            self.pool = build_pool(after);
        }
    }

    // ---- configuration ----

    /// Enables or disables parallel construction.
    pub fn set_parallel(&mut self, parallel: bool) {
        let before = self.config.parallelism();
        self.config.parallel = parallel;
        self.sync_pool(before);
    }

    /// Sets the thread count: 0 = automatic, 1 = serial.
    pub fn set_num_threads(&mut self, num_threads: usize) {
        let before = self.config.parallelism();
        self.config.num_threads = num_threads;
        self.sync_pool(before);
    }

    /// Enables or disables local search.
    pub fn set_local_search(&mut self, enabled: bool) {
        self.config.local_search = enabled;
    }

    /// Follows 2-opt with 3-opt when local search runs.
    pub fn set_use_three_opt(&mut self, enabled: bool) {
        self.config.use_three_opt = enabled;
    }

    /// Selects which tours local search is applied to.
    pub fn set_local_search_mode(&mut self, mode: LocalSearchMode) {
        self.config.local_search_mode = mode;
    }

    /// Selects the deposit strategy.
    pub fn set_pheromone_mode(&mut self, mode: PheromoneMode) {
        self.config.pheromone_mode = mode;
    }

    /// Enables or disables the elitist deposit.
    pub fn set_elitist(&mut self, enabled: bool) {
        self.config.elitist = enabled;
    }

    /// Sets the stagnation limit for convergence runs.
    pub fn set_convergence_threshold(&mut self, iterations: usize) -> AcoResult<()> {
        self.update_config(|c| c.convergence_threshold = iterations)
    }

    /// Sets the progress reporting interval.
    pub fn set_callback_interval(&mut self, iterations: usize) -> AcoResult<()> {
        self.update_config(|c| c.callback_interval = iterations)
    }

    /// Sets the number of ranked tours that deposit.
    pub fn set_rank_size(&mut self, k: usize) -> AcoResult<()> {
        self.update_config(|c| c.rank_size = Some(k))
    }

    /// Sets the elitist deposit weight.
    pub fn set_elitist_weight(&mut self, weight: f64) -> AcoResult<()> {
        self.update_config(|c| c.elitist_weight = Some(weight))
    }

    /// Sets or removes the pheromone clamp bounds.
    pub fn set_pheromone_bounds(&mut self, bounds: Option<(f64, f64)>) -> AcoResult<()> {
        self.update_config(|c| c.pheromone_bounds = bounds)
    }

    /// Reseeds the master generator; later solves start from this seed.
    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
        self.rng = create_rng(seed);
    }

    /// Installs an observer used when `solve` is called without one.
    pub fn set_progress_observer<O>(&mut self, observer: O)
    where
        O: ProgressObserver + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Removes the installed observer.
    pub fn clear_progress_observer(&mut self) {
        self.observer = None;
    }

    fn update_config(&mut self, edit: impl FnOnce(&mut ColonyConfig)) -> AcoResult<()> {
        let mut next = self.config.clone();
        edit(&mut next);
        next.validate()?;
        self.config = next;
        Ok(())
    }

    // ---- read-back ----

    /// Best tour found by the last solve (empty before any iteration).
    pub fn best_tour(&self) -> &Tour {
        &self.best
    }

    /// Iteration-best length of every completed iteration, in order.
    pub fn convergence_history(&self) -> &[f64] {
        &self.history
    }

    /// Iterations completed since the last initialization.
    pub fn iterations_run(&self) -> usize {
        self.history.len()
    }

    /// Tours built in the most recent iteration.
    pub fn current_tours(&self) -> &[Tour] {
        &self.tours
    }

    /// The pheromone field.
    pub fn pheromones(&self) -> &PheromoneField {
        &self.pheromones
    }

    /// The problem being solved.
    pub fn instance(&self) -> &ProblemInstance {
        &self.instance
    }

    /// The active configuration.
    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// Ants per iteration.
    pub fn population(&self) -> usize {
        self.config.num_ants
    }

    /// Pheromone exponent (α).
    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    /// Distance heuristic exponent (β).
    pub fn beta(&self) -> f64 {
        self.config.beta
    }

    /// Evaporation rate (ρ).
    pub fn rho(&self) -> f64 {
        self.config.rho
    }

    /// Deposit scale (Q).
    pub fn q(&self) -> f64 {
        self.config.q
    }
}

impl fmt::Debug for Colony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Colony")
            .field("num_cities", &self.instance.num_cities())
            .field("config", &self.config)
            .field("best_length", &self.best.length())
            .field("iterations", &self.history.len())
            .finish_non_exhaustive()
    }
}

/// Resets `ant` at `start` and walks it to a complete tour.
fn build_tour(
    ant: &mut Ant,
    start: usize,
    seed: u64,
    distances: &DistanceMatrix,
    pheromones: &PheromoneField,
    alpha: f64,
    beta: f64,
) -> AcoResult<Tour> {
    let mut rng = create_rng(seed);
    ant.reset(start)?;
    while let Some(next) = ant.select_next_city(distances, pheromones, alpha, beta, &mut rng) {
        ant.visit_city(next, distances)?;
    }
    ant.complete_tour(distances)
}

/// Index of the shortest tour; ties go to the lowest index.
fn best_index(tours: &[Tour], parallel: bool) -> Option<usize> {
    let shorter = |a: (usize, f64), b: (usize, f64)| {
        if b.1 < a.1 || (b.1 == a.1 && b.0 < a.0) {
            b
        } else {
            a
        }
    };
    let best = if parallel {
        tours
            .par_iter()
            .enumerate()
            .map(|(i, t)| (i, t.length()))
            .reduce_with(shorter)
    } else {
        tours
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t.length()))
            .reduce(shorter)
    };
    best.map(|(i, _)| i)
}

fn build_pool(parallelism: Parallelism) -> Option<ThreadPool> {
    match parallelism {
        Parallelism::Threads(n) => match ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => Some(pool),
            Err(err) => {
                warn!(threads = n, error = %err, "thread pool unavailable, using global pool");
                None
            }
        },
        Parallelism::Serial | Parallelism::Auto => None,
    }
}

fn run_in<R, F>(pool: Option<&ThreadPool>, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::tour_length;
    use crate::models::City;

    fn instance(points: &[(f64, f64)]) -> ProblemInstance {
        let cities = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| City::new(i, x, y))
            .collect();
        ProblemInstance::new(cities).expect("valid instance")
    }

    fn triangle() -> ProblemInstance {
        instance(&[(0.0, 0.0), (3.0, 0.0), (0.0, 4.0)])
    }

    fn unit_square() -> ProblemInstance {
        instance(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    fn ring(n: usize) -> ProblemInstance {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let theta = i as f64 * std::f64::consts::TAU / n as f64;
                (50.0 * theta.cos(), 50.0 * theta.sin())
            })
            .collect();
        instance(&points)
    }

    fn seeded(ants: usize) -> ColonyConfig {
        ColonyConfig::default().with_num_ants(ants).with_seed(42)
    }

    #[test]
    fn test_new_reads_back_parameters() {
        let colony = Colony::new(triangle(), 12, 1.5, 3.0, 0.25, 50.0, true).expect("valid");
        assert_eq!(colony.population(), 12);
        assert_eq!(colony.alpha(), 1.5);
        assert_eq!(colony.beta(), 3.0);
        assert_eq!(colony.rho(), 0.25);
        assert_eq!(colony.q(), 50.0);
        assert!(colony.config().distinct_start_cities);
        assert!(colony.best_tour().is_empty());
    }

    #[test]
    fn test_new_rejects_bad_parameters() {
        assert!(Colony::new(triangle(), 0, 1.0, 2.0, 0.5, 100.0, false).is_err());
        assert!(Colony::new(triangle(), 5, 1.0, 2.0, 1.5, 100.0, false).is_err());
        assert!(Colony::new(triangle(), 5, 1.0, 2.0, 0.5, 0.0, false).is_err());
    }

    #[test]
    fn test_initialize_tau0() {
        let mut colony = Colony::new(triangle(), 6, 1.0, 2.0, 0.5, 100.0, false).expect("valid");
        colony.initialize();
        // 6 ants / nearest-neighbor length 12
        assert!((colony.pheromones().get(0, 1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_triangle_any_tour_is_12() {
        let config = seeded(20);
        let mut colony = Colony::with_config(triangle(), config).expect("valid");
        let best = colony.solve(StopCondition::Iterations(50), None).expect("solve");
        assert!(best.validate(3));
        assert!(best.length() <= 12.1);
        assert!((best.length() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_square_optimum() {
        let config = seeded(30);
        let mut colony = Colony::with_config(unit_square(), config).expect("valid");
        let best = colony.solve(StopCondition::Iterations(100), None).expect("solve");
        assert!(best.validate(4));
        assert!(best.length() <= 4.1);
    }

    #[test]
    fn test_single_city() {
        let mut colony =
            Colony::with_config(instance(&[(3.0, 3.0)]), seeded(5)).expect("valid");
        let best = colony.solve(StopCondition::Iterations(10), None).expect("solve");
        assert_eq!(best.sequence(), &[0]);
        assert_eq!(best.length(), 0.0);
    }

    #[test]
    fn test_two_cities() {
        for ants in [1, 3, 9] {
            let inst = instance(&[(0.0, 0.0), (5.0, 0.0)]);
            let mut colony = Colony::with_config(inst, seeded(ants)).expect("valid");
            let best = colony.solve(StopCondition::Iterations(7), None).expect("solve");
            assert_eq!(best.length(), 10.0);
            assert!(best.validate(2));
        }
    }

    #[test]
    fn test_history_one_entry_per_iteration() {
        let mut colony = Colony::with_config(ring(8), seeded(4)).expect("valid");
        colony.solve(StopCondition::Iterations(25), None).expect("solve");
        assert_eq!(colony.convergence_history().len(), 25);
        assert_eq!(colony.iterations_run(), 25);
        let min = colony
            .convergence_history()
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        assert_eq!(min, colony.best_tour().length());
    }

    #[test]
    fn test_solve_resets_state() {
        let mut colony = Colony::with_config(ring(8), seeded(4)).expect("valid");
        colony.solve(StopCondition::Iterations(15), None).expect("solve");
        colony.solve(StopCondition::Iterations(5), None).expect("solve");
        assert_eq!(colony.convergence_history().len(), 5);
    }

    #[test]
    fn test_zero_iterations() {
        let mut colony = Colony::with_config(ring(6), seeded(4)).expect("valid");
        let best = colony.solve(StopCondition::Iterations(0), None).expect("solve");
        assert!(best.is_empty());
        assert!(colony.convergence_history().is_empty());
    }

    #[test]
    fn test_convergence_stops() {
        let mut colony = Colony::with_config(unit_square(), seeded(5)).expect("valid");
        colony.set_convergence_threshold(15).expect("valid threshold");
        colony.solve(StopCondition::Convergence, None).expect("solve");
        let runs = colony.iterations_run();
        assert!(runs >= 15);
        // The last 15 iterations brought no improvement.
        let history = colony.convergence_history();
        let best = colony.best_tour().length();
        let before_tail = history[..runs - 15]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        assert!(before_tail <= best);
    }

    #[test]
    fn test_observer_interval() {
        let mut colony = Colony::with_config(ring(7), seeded(4)).expect("valid");
        colony.set_callback_interval(5).expect("valid interval");
        let mut seen: Vec<(usize, usize)> = Vec::new();
        let mut observer = |iteration: usize, best: f64, tour: &[usize], history: &[f64]| {
            assert!(best.is_finite());
            assert_eq!(tour.len(), 7);
            seen.push((iteration, history.len()));
        };
        colony
            .solve(StopCondition::Iterations(23), Some(&mut observer))
            .expect("solve");
        assert_eq!(seen, vec![(5, 5), (10, 10), (15, 15), (20, 20)]);
    }

    #[test]
    fn test_installed_observer() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut colony = Colony::with_config(ring(6), seeded(3)).expect("valid");
        colony.set_progress_observer(move |_: usize, _: f64, _: &[usize], _: &[f64]| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        colony.solve(StopCondition::Iterations(30), None).expect("solve");
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_seeded_serial_runs_repeat() {
        let config = ColonyConfig::default()
            .with_num_ants(10)
            .with_num_threads(1)
            .with_seed(7);
        let mut a = Colony::with_config(ring(12), config.clone()).expect("valid");
        let mut b = Colony::with_config(ring(12), config).expect("valid");
        let ta = a.solve(StopCondition::Iterations(20), None).expect("solve");
        let tb = b.solve(StopCondition::Iterations(20), None).expect("solve");
        assert_eq!(ta, tb);
        assert_eq!(a.convergence_history(), b.convergence_history());
    }

    #[test]
    fn test_distinct_starts_cycle() {
        let config = ColonyConfig::default()
            .with_num_ants(5)
            .with_distinct_start_cities(true)
            .with_seed(1);
        let mut colony = Colony::with_config(triangle(), config).expect("valid");
        colony.initialize();
        colony.construct_solutions().expect("construct");
        let starts: Vec<usize> = colony
            .current_tours()
            .iter()
            .map(|t| t.sequence()[0])
            .collect();
        assert_eq!(starts, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_update_best_iteration_only_touches_best_edges() {
        let config = ColonyConfig::default()
            .with_num_ants(6)
            .with_rho(1.0)
            .with_pheromone_mode(PheromoneMode::BestIteration)
            .with_seed(3);
        let inst = ring(6);
        let mut colony = Colony::with_config(inst, config).expect("valid");
        colony.initialize();
        colony.construct_solutions().expect("construct");
        colony.update_pheromones();

        let best = colony
            .current_tours()
            .iter()
            .min_by(|a, b| a.length().total_cmp(&b.length()))
            .expect("tours")
            .clone();
        let amount = 100.0 / best.length();
        let field = colony.pheromones();
        let mut expected = vec![vec![0.0; 6]; 6];
        for (a, b) in best.edges() {
            expected[a][b] += amount;
            expected[b][a] += amount;
        }
        for a in 0..6 {
            for b in 0..6 {
                assert!((field.get(a, b) - expected[a][b]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_rank_weights() {
        let config = ColonyConfig::default()
            .with_num_ants(4)
            .with_rho(1.0)
            .with_pheromone_mode(PheromoneMode::Rank)
            .with_rank_size(2)
            .with_q(1.0)
            .with_seed(11);
        let mut colony = Colony::with_config(ring(5), config).expect("valid");
        colony.initialize();
        colony.construct_solutions().expect("construct");
        colony.update_pheromones();

        let mut sorted: Vec<Tour> = colony.current_tours().to_vec();
        sorted.sort_by(|a, b| a.length().total_cmp(&b.length()));
        let mut expected = [[0.0f64; 5]; 5];
        for (rank, tour) in sorted.iter().take(2).enumerate() {
            let amount = (2 - rank) as f64 / tour.length();
            for (a, b) in tour.edges() {
                expected[a][b] += amount;
                expected[b][a] += amount;
            }
        }
        for a in 0..5 {
            for b in 0..5 {
                assert!((colony.pheromones().get(a, b) - expected[a][b]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_elitist_adds_to_best_edges() {
        let inst = unit_square();
        let base = ColonyConfig::default()
            .with_num_ants(2)
            .with_rho(1.0)
            .with_pheromone_mode(PheromoneMode::BestSoFar)
            .with_seed(5);
        let mut plain = Colony::with_config(inst.clone(), base.clone()).expect("valid");
        let mut elite = Colony::with_config(inst, base.with_elitist(true).with_elitist_weight(3.0))
            .expect("valid");

        plain.solve(StopCondition::Iterations(1), None).expect("solve");
        elite.solve(StopCondition::Iterations(1), None).expect("solve");

        let best = plain.best_tour().clone();
        assert_eq!(&best, elite.best_tour());
        for (a, b) in best.edges() {
            let p = plain.pheromones().get(a, b);
            let e = elite.pheromones().get(a, b);
            assert!((e - 4.0 * p).abs() < 1e-9);
        }
    }

    #[test]
    fn test_local_search_all_yields_local_optima() {
        let config = ColonyConfig::default()
            .with_num_ants(6)
            .with_local_search(true)
            .with_three_opt(false)
            .with_local_search_mode(LocalSearchMode::All)
            .with_seed(9);
        let inst = ring(10);
        let mut colony = Colony::with_config(inst.clone(), config).expect("valid");
        colony.initialize();
        colony.construct_solutions().expect("construct");
        colony.apply_local_search();
        for tour in colony.current_tours() {
            assert!(tour.validate(10));
            let mut again = tour.clone();
            assert!(!crate::local_search::two_opt(&mut again, inst.distances()));
            let exact = tour_length(tour.sequence(), inst.distances());
            assert!((tour.length() - exact).abs() < 1e-9);
        }
    }

    #[test]
    fn test_local_search_best_finds_ring_optimum() {
        let inst = ring(12);
        let optimum = tour_length(&(0..12).collect::<Vec<_>>(), inst.distances());
        let config = ColonyConfig::default()
            .with_num_ants(10)
            .with_local_search(true)
            .with_seed(2);
        let mut colony = Colony::with_config(inst, config).expect("valid");
        let best = colony.solve(StopCondition::Iterations(30), None).expect("solve");
        assert!(best.validate(12));
        assert!(best.length() <= optimum + 1e-6);
    }

    #[test]
    fn test_bounds_clamp_field() {
        let config = ColonyConfig::default()
            .with_num_ants(8)
            .with_pheromone_bounds(0.01, 0.5)
            .with_seed(4);
        let mut colony = Colony::with_config(ring(9), config).expect("valid");
        colony.solve(StopCondition::Iterations(10), None).expect("solve");
        let field = colony.pheromones();
        for a in 0..9 {
            for b in 0..9 {
                let v = field.get(a, b);
                assert!((0.01..=0.5).contains(&v));
            }
        }
    }

    #[test]
    fn test_parallel_with_explicit_threads() {
        let config = ColonyConfig::default()
            .with_num_ants(16)
            .with_num_threads(3)
            .with_local_search(true)
            .with_local_search_mode(LocalSearchMode::All)
            .with_seed(8);
        let inst = ring(15);
        let mut colony = Colony::with_config(inst, config).expect("valid");
        let best = colony.solve(StopCondition::Iterations(10), None).expect("solve");
        assert!(best.validate(15));
        assert_eq!(colony.convergence_history().len(), 10);
    }

    #[test]
    fn test_setters_validate() {
        let mut colony = Colony::with_config(triangle(), seeded(4)).expect("valid");
        assert!(colony.set_callback_interval(0).is_err());
        assert!(colony.set_convergence_threshold(0).is_err());
        assert!(colony.set_rank_size(0).is_err());
        assert!(colony.set_elitist_weight(-2.0).is_err());
        assert!(colony.set_pheromone_bounds(Some((1.0, 0.5))).is_err());
        assert_eq!(colony.config().callback_interval, 10);

        colony.set_pheromone_mode(PheromoneMode::Rank);
        colony.set_rank_size(3).expect("valid");
        colony.set_local_search(true);
        colony.set_use_three_opt(false);
        colony.set_local_search_mode(LocalSearchMode::All);
        colony.set_elitist(true);
        colony.set_parallel(false);
        colony.set_num_threads(2);
        assert_eq!(colony.config().pheromone_mode, PheromoneMode::Rank);
        assert_eq!(colony.config().rank_size, Some(3));
        assert!(colony.config().local_search_enabled());
        assert_eq!(colony.config().parallelism(), Parallelism::Serial);
    }

    #[test]
    fn test_degenerate_parameters_do_not_panic() {
        for (alpha, beta, rho) in [(0.0, 0.0, 0.0), (0.0, 2.0, 1.0), (3.0, 0.0, 1.0), (1.0, 1.0, 0.0)] {
            let config = ColonyConfig::default()
                .with_num_ants(3)
                .with_alpha(alpha)
                .with_beta(beta)
                .with_rho(rho)
                .with_seed(12);
            let mut colony = Colony::with_config(ring(6), config).expect("valid");
            let best = colony.solve(StopCondition::Iterations(15), None).expect("solve");
            assert!(best.validate(6));
        }
    }
}
