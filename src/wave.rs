use itertools::Itertools;
use ndarray::Array2;
use rand::Rng;

/// The per-cell superposition of still-possible patterns.
///
/// Alongside the possibility bitmap, every cell caches the scalar sums its
/// Shannon entropy is derived from, so an elimination is O(1) and an
/// observation scan is O(cells). Possibilities only ever transition from
/// possible to impossible during a solve.
pub(crate) struct Wave {
    pub(crate) height: usize,
    pub(crate) width: usize,
    /// Number of cells, `height * width`.
    pub(crate) size: usize,
    num_patterns: usize,
    weights: Vec<f64>,
    weight_log_weights: Vec<f64>,
    sum_weights: Vec<f64>,
    sum_weight_log_weights: Vec<f64>,
    log_sum_weights: Vec<f64>,
    counts: Vec<usize>,
    entropies: Vec<f64>,
    /// Tie-breaking jitter, drawn once per cell at construction so entropy
    /// comparisons are stable for the whole run.
    noise: Vec<f64>,
    impossible: bool,
    data: Array2<bool>,
}

impl Wave {
    /// A wave of `height * width` cells with every one of the (normalized)
    /// `weights.len()` patterns possible everywhere.
    pub(crate) fn new(height: usize, width: usize, weights: &[f64], rng: &mut impl Rng) -> Self {
        let size = height * width;
        let num_patterns = weights.len();
        let weight_log_weights = weights.iter().map(|w| w * w.ln()).collect_vec();
        let sum: f64 = weights.iter().sum();
        let sum_plogw: f64 = weight_log_weights.iter().sum();
        let entropy = sum.ln() - sum_plogw / sum;
        // half the smallest |w log w|, so jitter can only reorder exact ties
        let half_min = weight_log_weights
            .iter()
            .map(|p| p.abs())
            .fold(f64::INFINITY, f64::min)
            / 2.0;
        let noise = (0..size).map(|_| rng.gen::<f64>() * half_min).collect_vec();

        Self {
            height,
            width,
            size,
            num_patterns,
            weights: weights.to_vec(),
            weight_log_weights,
            sum_weights: vec![sum; size],
            sum_weight_log_weights: vec![sum_plogw; size],
            log_sum_weights: vec![sum.ln(); size],
            counts: vec![num_patterns; size],
            entropies: vec![entropy; size],
            noise,
            impossible: false,
            data: Array2::from_elem((size, num_patterns), true),
        }
    }

    /// Whether `pattern` is still possible in the cell at `index`.
    #[inline]
    pub(crate) fn get(&self, index: usize, pattern: usize) -> bool {
        self.data[[index, pattern]]
    }

    /// Number of patterns still possible in the cell at `index`.
    #[cfg(test)]
    pub(crate) fn count(&self, index: usize) -> usize {
        self.counts[index]
    }

    /// Whether some cell has run out of patterns.
    #[inline]
    pub(crate) fn is_impossible(&self) -> bool {
        self.impossible
    }

    /// Rule out `pattern` in the cell at `index`, updating the cached sums.
    /// Does nothing if the pattern is already impossible there.
    pub(crate) fn forbid(&mut self, index: usize, pattern: usize) {
        if !self.data[[index, pattern]] {
            return;
        }
        self.data[[index, pattern]] = false;

        self.sum_weight_log_weights[index] -= self.weight_log_weights[pattern];
        self.sum_weights[index] -= self.weights[pattern];
        self.log_sum_weights[index] = self.sum_weights[index].ln();
        self.counts[index] -= 1;
        self.entropies[index] =
            self.log_sum_weights[index] - self.sum_weight_log_weights[index] / self.sum_weights[index];

        if self.counts[index] == 0 {
            self.impossible = true;
        }
    }

    /// The unfinished cell with the least entropy, jitter included, or
    /// `None` when every cell holds exactly one pattern.
    ///
    /// Callers must check [`is_impossible`](Wave::is_impossible) first.
    pub(crate) fn min_entropy_cell(&self) -> Option<usize> {
        let mut min = f64::INFINITY;
        let mut argmin = None;
        for index in 0..self.size {
            if self.counts[index] == 1 {
                continue;
            }
            let entropy = self.entropies[index] + self.noise[index];
            if entropy < min {
                min = entropy;
                argmin = Some(index);
            }
        }
        argmin
    }

    /// The patterns still possible in the cell at `index`.
    pub(crate) fn possible_patterns(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_patterns).filter(move |&pattern| self.get(index, pattern))
    }

    #[cfg(test)]
    pub(crate) fn sum_weights(&self, index: usize) -> f64 {
        self.sum_weights[index]
    }

    #[cfg(test)]
    pub(crate) fn sum_weight_log_weights(&self, index: usize) -> f64 {
        self.sum_weight_log_weights[index]
    }

    #[cfg(test)]
    pub(crate) fn entropy(&self, index: usize) -> f64 {
        self.entropies[index]
    }
}
