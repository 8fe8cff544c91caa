use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

pub use crate::propagator::CompatibilityTable;

use crate::grid::Grid2D;
use crate::propagator::Propagator;
use crate::wave::Wave;

/// The solver eliminated every pattern at some cell.
///
/// This is a normal outcome of a single attempt, not a fault; wrappers such
/// as [`run_overlapping`](crate::run_overlapping) retry with a fresh seed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("a cell was left with no possible pattern")]
pub struct Contradiction;

/// Outcome of a single observation step.
enum Observation {
    /// A cell was collapsed; its eliminations are queued.
    Pending,
    /// Every cell holds exactly one pattern.
    Complete,
    /// Some cell holds none.
    Contradicted,
}

/// The mode-agnostic core: a wave plus a propagator plus a seeded RNG, run
/// to completion or contradiction.
///
/// Adapters construct one from a pattern weight vector and a
/// [`CompatibilityTable`] and decode the pattern-index grid it produces. For
/// a fixed seed and fixed inputs, every choice the solver makes is
/// deterministic.
pub struct Solver {
    rng: StdRng,
    /// Pattern weights, normalized to sum to one.
    weights: Vec<f64>,
    wave: Wave,
    propagator: Propagator,
}

impl Solver {
    /// A fresh solver over a `wave_height` x `wave_width` wave.
    ///
    /// `weights` need not be normalized. `rules` must have one entry per
    /// weight.
    pub fn new(
        wave_height: usize,
        wave_width: usize,
        periodic_output: bool,
        weights: &[f64],
        rules: CompatibilityTable,
        seed: u64,
    ) -> Self {
        debug_assert_eq!(weights.len(), rules.len());
        let total: f64 = weights.iter().sum();
        let weights = weights.iter().map(|w| w / total).collect_vec();

        let mut rng = StdRng::seed_from_u64(seed);
        let wave = Wave::new(wave_height, wave_width, &weights, &mut rng);
        let propagator = Propagator::new(wave_height, wave_width, periodic_output, rules);

        Self {
            rng,
            weights,
            wave,
            propagator,
        }
    }

    /// Rule out `pattern` at cell `(y, x)` and queue the elimination.
    ///
    /// Used by adapters for pre-constraints such as the ground row; call
    /// [`propagate`](Solver::propagate) afterwards.
    pub fn forbid(&mut self, y: usize, x: usize, pattern: usize) {
        let index = y * self.wave.width + x;
        if self.wave.get(index, pattern) {
            self.wave.forbid(index, pattern);
            self.propagator.enqueue(y, x, pattern);
        }
    }

    /// Drain queued eliminations to their fixed point.
    pub fn propagate(&mut self) -> Result<(), Contradiction> {
        self.propagator.propagate(&mut self.wave)
    }

    /// Pick the unfinished cell with the least entropy and collapse it to a
    /// single pattern sampled by weight.
    fn observe(&mut self) -> Observation {
        if self.wave.is_impossible() {
            return Observation::Contradicted;
        }
        let Some(cell) = self.wave.min_entropy_cell() else {
            return Observation::Complete;
        };

        let total: f64 = self
            .wave
            .possible_patterns(cell)
            .map(|pattern| self.weights[pattern])
            .sum();
        let mut remaining = self.rng.gen_range(0.0..total);
        let mut chosen = 0;
        for pattern in 0..self.weights.len() {
            if !self.wave.get(cell, pattern) {
                continue;
            }
            chosen = pattern;
            remaining -= self.weights[pattern];
            if remaining <= 0.0 {
                break;
            }
        }

        let (y, x) = (cell / self.wave.width, cell % self.wave.width);
        for pattern in 0..self.weights.len() {
            if pattern != chosen && self.wave.get(cell, pattern) {
                self.wave.forbid(cell, pattern);
                self.propagator.enqueue(y, x, pattern);
            }
        }
        Observation::Pending
    }

    /// Observe and propagate until completion or contradiction, returning
    /// the pattern index chosen for each cell.
    pub fn run(&mut self) -> Result<Grid2D<usize>, Contradiction> {
        loop {
            match self.observe() {
                Observation::Complete => return Ok(self.to_output()),
                Observation::Contradicted => return Err(Contradiction),
                Observation::Pending => self.propagate()?,
            }
        }
    }

    fn to_output(&self) -> Grid2D<usize> {
        Grid2D::from_shape_fn(self.wave.height, self.wave.width, |(y, x)| {
            let index = y * self.wave.width + x;
            self.wave
                .possible_patterns(index)
                .next()
                .expect("a completed wave holds one pattern per cell")
        })
    }

    #[cfg(test)]
    pub(crate) fn wave(&self) -> &Wave {
        &self.wave
    }

    #[cfg(test)]
    pub(crate) fn propagator(&self) -> &Propagator {
        &self.propagator
    }
}
