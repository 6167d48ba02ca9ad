//! Random number generator construction.
//!
//! The colony owns one master generator. Every iteration it draws a fresh
//! seed per ant, so each ant walks with its own independent generator and
//! the tour it builds does not depend on which thread runs it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_aco::random::create_rng;
///
/// let mut a = create_rng(42);
/// let mut b = create_rng(42);
/// assert_eq!(a.random::<u64>(), b.random::<u64>());
/// ```
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator seeded from operating system entropy.
pub fn entropy_rng() -> StdRng {
    StdRng::from_os_rng()
}

/// Creates the master generator: seeded if `seed` is given, otherwise from
/// entropy.
pub fn master_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => create_rng(s),
        None => entropy_rng(),
    }
}

/// Draws `count` per-ant seeds from `rng`.
pub fn draw_seeds<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.random::<u64>()).collect()
}
