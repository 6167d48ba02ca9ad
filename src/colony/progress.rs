//! Progress reporting hook.

/// Receives periodic progress from [`Colony::solve`](super::Colony::solve).
///
/// Called synchronously on the solving thread every
/// `callback_interval` iterations. Any
/// `FnMut(usize, f64, &[usize], &[f64])` closure implements this trait.
///
/// # Examples
///
/// ```
/// use u_aco::colony::ProgressObserver;
///
/// let mut calls = Vec::new();
/// let mut observer = |iteration: usize, best: f64, _tour: &[usize], _history: &[f64]| {
///     calls.push((iteration, best));
/// };
/// observer.on_progress(10, 42.0, &[0, 1], &[50.0, 42.0]);
/// assert_eq!(calls, vec![(10, 42.0)]);
/// ```
pub trait ProgressObserver {
    /// `iteration` is 1-based; `history` holds one iteration-best length per
    /// completed iteration.
    fn on_progress(&mut self, iteration: usize, best_length: f64, best_tour: &[usize], history: &[f64]);
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, f64, &[usize], &[f64]),
{
    fn on_progress(&mut self, iteration: usize, best_length: f64, best_tour: &[usize], history: &[f64]) {
        self(iteration, best_length, best_tour, history)
    }
}

/// When a [`solve`](super::Colony::solve) run stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// After exactly this many iterations.
    Iterations(usize),
    /// After `convergence_threshold` consecutive iterations without a new
    /// global best.
    Convergence,
}

impl From<i64> for StopCondition {
    /// Negative counts mean "run to convergence".
    fn from(max_iterations: i64) -> Self {
        match usize::try_from(max_iterations) {
            Ok(n) => Self::Iterations(n),
            Err(_) => Self::Convergence,
        }
    }
}
