use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use itertools::Itertools;
use strum::VariantArray;

use crate::direction::Direction;
use crate::grid::Grid2D;
use crate::propagator::CompatibilityTable;
use crate::solver::{Contradiction, Solver};

/// Options for an [`Overlapping`] instance.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OverlappingOptions {
    /// Sample windows across the input edges, treating it as a torus.
    pub periodic_input: bool,
    /// Make the output itself toric.
    pub periodic_output: bool,
    /// Output height in cells.
    pub out_height: usize,
    /// Output width in cells.
    pub out_width: usize,
    /// How much of the dihedral orbit to take per window, in `1..=8`:
    /// 1 keeps the window as sampled, 2 adds its reflection, 4 the half
    /// orbit, 8 the full orbit of rotations and reflections.
    pub symmetry: u32,
    /// Pin the bottom output row to the pattern sampled at the bottom of the
    /// input, and ban that pattern everywhere else.
    ///
    /// The ground pattern is located by toric extraction at the last input
    /// row; it must be one of the extracted patterns, which always holds
    /// when `periodic_input` is set.
    pub ground: bool,
    /// Side length N of the square pattern windows.
    pub pattern_size: usize,
}

impl OverlappingOptions {
    /// Height of the wave the solver works on. Bounded output loses
    /// `N - 1` rows: only whole windows are solved for, and the bottom
    /// border is reconstructed from the last row of windows.
    pub fn wave_height(&self) -> usize {
        if self.periodic_output {
            self.out_height
        } else {
            self.out_height - self.pattern_size + 1
        }
    }

    /// Width of the wave the solver works on.
    pub fn wave_width(&self) -> usize {
        if self.periodic_output {
            self.out_width
        } else {
            self.out_width - self.pattern_size + 1
        }
    }
}

/// The overlapping-mode adapter: patterns are NxN windows of an example
/// grid, and two patterns may be neighbors exactly when their windows agree
/// on the overlap.
pub struct Overlapping<T: Clone + Eq + Hash> {
    options: OverlappingOptions,
    patterns: Vec<Grid2D<T>>,
    ground: Option<usize>,
    solver: Solver,
}

impl<T: Clone + Eq + Hash> Overlapping<T> {
    /// Extract patterns from `input` and set up a solver over them.
    pub fn new(input: &Grid2D<T>, options: OverlappingOptions, seed: u64) -> Self {
        let (patterns, weights) = extract_patterns(input, &options);
        let rules = compatibility(&patterns);
        let ground = options
            .ground
            .then(|| ground_pattern(input, &patterns, options.pattern_size));
        let solver = Solver::new(
            options.wave_height(),
            options.wave_width(),
            options.periodic_output,
            &weights,
            rules,
            seed,
        );

        Self {
            options,
            patterns,
            ground,
            solver,
        }
    }

    /// Run the solver, decoding the completed wave into an output grid of
    /// `out_height` x `out_width` cells.
    pub fn solve(mut self) -> Result<Grid2D<T>, Contradiction> {
        if let Some(ground) = self.ground {
            self.pin_ground(ground)?;
        }
        let cells = self.solver.run()?;
        Ok(self.render(&cells))
    }

    /// Constrain the bottom wave row to the ground pattern and ban the
    /// ground pattern from every other row, then settle the consequences.
    fn pin_ground(&mut self, ground: usize) -> Result<(), Contradiction> {
        let (height, width) = (self.options.wave_height(), self.options.wave_width());
        for x in 0..width {
            for pattern in 0..self.patterns.len() {
                if pattern != ground {
                    self.solver.forbid(height - 1, x, pattern);
                }
            }
        }
        for y in 0..height - 1 {
            for x in 0..width {
                self.solver.forbid(y, x, ground);
            }
        }
        self.solver.propagate()
    }

    /// Paint the output. A toric output takes each cell's top-left pattern
    /// pixel; a bounded one additionally reads the last `N - 1` border rows
    /// and columns from deeper inside the edge cells' patterns.
    fn render(&self, cells: &Grid2D<usize>) -> Grid2D<T> {
        let (wave_height, wave_width) = (self.options.wave_height(), self.options.wave_width());
        Grid2D::from_shape_fn(self.options.out_height, self.options.out_width, |(y, x)| {
            let cy = y.min(wave_height - 1);
            let cx = x.min(wave_width - 1);
            self.patterns[*cells.get(cy, cx)]
                .get(y - cy, x - cx)
                .clone()
        })
    }

    #[cfg(test)]
    pub(crate) fn patterns(&self) -> &[Grid2D<T>] {
        &self.patterns
    }
}

/// Enumerate the NxN windows of `input`, expand each by the requested slice
/// of its dihedral orbit, and deduplicate, counting multiplicity as weight.
/// Patterns are numbered in order of first occurrence.
pub(crate) fn extract_patterns<T: Clone + Eq + Hash>(
    input: &Grid2D<T>,
    options: &OverlappingOptions,
) -> (Vec<Grid2D<T>>, Vec<f64>) {
    let n = options.pattern_size;
    debug_assert!(n <= input.height() && n <= input.width());
    debug_assert!((1..=8).contains(&options.symmetry));

    let max_y = if options.periodic_input {
        input.height()
    } else {
        input.height() - n + 1
    };
    let max_x = if options.periodic_input {
        input.width()
    } else {
        input.width() - n + 1
    };

    let mut ids: HashMap<Grid2D<T>, usize> = HashMap::new();
    let mut patterns = Vec::new();
    let mut weights: Vec<f64> = Vec::new();

    for (y, x) in (0..max_y).cartesian_product(0..max_x) {
        let mut orbit = Vec::with_capacity(options.symmetry as usize);
        orbit.push(input.sub_grid(y, x, n, n));
        while orbit.len() < options.symmetry as usize {
            let k = orbit.len();
            // odd entries reflect their predecessor, even entries rotate the
            // entry two back
            let next = if k % 2 == 1 {
                orbit[k - 1].reflected()
            } else {
                orbit[k - 2].rotated()
            };
            orbit.push(next);
        }

        for variant in orbit {
            match ids.entry(variant) {
                Entry::Occupied(entry) => weights[*entry.get()] += 1.0,
                Entry::Vacant(entry) => {
                    patterns.push(entry.key().clone());
                    weights.push(1.0);
                    entry.insert(patterns.len() - 1);
                }
            }
        }
    }

    (patterns, weights)
}

/// Whether `a` and `b` agree on the overlap induced by shifting `b` by
/// `(dy, dx)` relative to `a`.
fn agrees<T: Eq>(a: &Grid2D<T>, b: &Grid2D<T>, dy: isize, dx: isize) -> bool {
    let n = a.height() as isize;
    let ys = if dy < 0 { 0..n + dy } else { dy..n };
    let xs = if dx < 0 { 0..n + dx } else { dx..n };
    ys.cartesian_product(xs).all(|(y, x)| {
        a.get(y as usize, x as usize) == b.get((y - dy) as usize, (x - dx) as usize)
    })
}

/// The exhaustive overlap-agreement table over `patterns`.
pub(crate) fn compatibility<T: Clone + Eq + Hash>(patterns: &[Grid2D<T>]) -> CompatibilityTable {
    patterns
        .iter()
        .map(|pattern| {
            std::array::from_fn(|d| {
                let direction = Direction::VARIANTS[d];
                patterns
                    .iter()
                    .positions(|other| agrees(pattern, other, direction.dy(), direction.dx()))
                    .collect()
            })
        })
        .collect()
}

/// The pattern sampled at the bottom of the input, used by the ground
/// option.
fn ground_pattern<T: Clone + Eq>(input: &Grid2D<T>, patterns: &[Grid2D<T>], n: usize) -> usize {
    let bottom = input.sub_grid(input.height() - 1, input.width() / 2, n, n);
    patterns
        .iter()
        .position(|pattern| *pattern == bottom)
        .expect("the bottom window is always among the extracted patterns")
}
