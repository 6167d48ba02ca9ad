//! Symmetric pheromone matrix with lock-free deposits.

use std::sync::atomic::{AtomicU64, Ordering};

/// A symmetric n×n matrix of pheromone intensities.
///
/// Cells hold `f64` bit patterns in [`AtomicU64`]s so that [`deposit`] can be
/// called through a shared reference from several threads at once. Bulk
/// updates ([`evaporate`], [`clamp`], [`fill`], [`set`]) take `&mut self` and
/// bypass the atomics.
///
/// `(a, b)` and `(b, a)` share one cell in upper-triangular storage, so the
/// field stays symmetric however deposits interleave.
///
/// [`deposit`]: PheromoneField::deposit
/// [`evaporate`]: PheromoneField::evaporate
/// [`clamp`]: PheromoneField::clamp
/// [`fill`]: PheromoneField::fill
/// [`set`]: PheromoneField::set
///
/// # Examples
///
/// ```
/// use u_aco::pheromone::PheromoneField;
///
/// let mut field = PheromoneField::new(3, 100.0);
/// field.evaporate(0.5);
/// field.evaporate(0.5);
/// assert_eq!(field.get(0, 1), 25.0);
///
/// field.deposit(0, 1, 5.0);
/// assert_eq!(field.get(1, 0), 30.0);
/// ```
#[derive(Debug)]
pub struct PheromoneField {
    cells: Vec<AtomicU64>,
    size: usize,
    min: f64,
    max: f64,
}

impl PheromoneField {
    /// Creates a field of `size` cities with every cell set to `initial`.
    ///
    /// Bounds default to `[0, f64::MAX]`.
    pub fn new(size: usize, initial: f64) -> Self {
        let bits = initial.to_bits();
        Self {
            cells: (0..size * (size + 1) / 2)
                .map(|_| AtomicU64::new(bits))
                .collect(),
            size,
            min: 0.0,
            max: f64::MAX,
        }
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, a: usize, b: usize) -> usize {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        assert!(hi < self.size, "city index {hi} out of range for {} cities", self.size);
        lo * (2 * self.size - lo - 1) / 2 + hi
    }

    /// Resets every cell to `value`.
    pub fn fill(&mut self, value: f64) {
        let bits = value.to_bits();
        for cell in &mut self.cells {
            *cell.get_mut() = bits;
        }
    }

    /// Pheromone on edge `(a, b)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> f64 {
        f64::from_bits(self.cells[self.index(a, b)].load(Ordering::Relaxed))
    }

    /// Sets edge `(a, b)` (and so `(b, a)`) to `value`.
    pub fn set(&mut self, a: usize, b: usize, value: f64) {
        let i = self.index(a, b);
        *self.cells[i].get_mut() = value.to_bits();
    }

    /// Multiplies every cell by `1 - rho`.
    ///
    /// `rho = 0` leaves the field unchanged and `rho = 1` zeroes it.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho;
        for cell in &mut self.cells {
            let v = f64::from_bits(*cell.get_mut());
            *cell.get_mut() = (v * keep).to_bits();
        }
    }

    /// Adds `amount` to edge `(a, b)`.
    ///
    /// Safe to call concurrently: the cell is updated with a compare-and-swap
    /// loop, so overlapping deposits from different threads all land.
    pub fn deposit(&self, a: usize, b: usize, amount: f64) {
        atomic_add(&self.cells[self.index(a, b)], amount);
    }

    /// Truncates every cell into `[min, max]`.
    pub fn clamp(&mut self, min: f64, max: f64) {
        for cell in &mut self.cells {
            let v = f64::from_bits(*cell.get_mut());
            *cell.get_mut() = v.max(min).min(max).to_bits();
        }
    }

    /// Truncates every cell into the stored bounds.
    pub fn clamp_to_bounds(&mut self) {
        let (min, max) = (self.min, self.max);
        self.clamp(min, max);
    }

    /// Stored lower bound.
    pub fn min_bound(&self) -> f64 {
        self.min
    }

    /// Stored upper bound.
    pub fn max_bound(&self) -> f64 {
        self.max
    }

    /// Replaces the stored bounds used by [`clamp_to_bounds`](Self::clamp_to_bounds).
    pub fn set_bounds(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }
}

impl Clone for PheromoneField {
    fn clone(&self) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .map(|c| AtomicU64::new(c.load(Ordering::Relaxed)))
                .collect(),
            size: self.size,
            min: self.min,
            max: self.max,
        }
    }
}

fn atomic_add(cell: &AtomicU64, amount: f64) {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        let next = (f64::from_bits(current) + amount).to_bits();
        match cell.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return,
            Err(actual) => current = actual,
        }
    }
}
