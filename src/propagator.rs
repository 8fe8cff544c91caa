use std::collections::VecDeque;

use itertools::Itertools;
use strum::VariantArray;

use crate::direction::Direction;
use crate::grid::Grid3D;
use crate::solver::Contradiction;
use crate::wave::Wave;

/// For every pattern and direction index, the patterns allowed to appear one
/// step away in that direction.
pub type CompatibilityTable = Vec<[Vec<usize>; 4]>;

/// Drives eliminations to their fixed point.
///
/// `support.get(y, x, p)[d]` counts the patterns still possible in the
/// neighbor of `(y, x)` opposite to `d` that allow `p` here; when it reaches
/// zero, `p` has lost its last support from that side and dies. Enqueueing an
/// elimination zeroes all four counters of the dead pattern so later
/// decrements go negative instead of re-firing.
pub(crate) struct Propagator {
    rules: CompatibilityTable,
    wave_height: usize,
    wave_width: usize,
    periodic: bool,
    queue: VecDeque<(usize, usize, usize)>,
    support: Grid3D<[i32; 4]>,
}

impl Propagator {
    pub(crate) fn new(
        wave_height: usize,
        wave_width: usize,
        periodic: bool,
        rules: CompatibilityTable,
    ) -> Self {
        // at rest the support counters are identical for every cell, so
        // encode them once per pattern and broadcast
        let base = rules
            .iter()
            .map(|allowed| {
                std::array::from_fn(|d| allowed[Direction::VARIANTS[d].opposite().index()].len() as i32)
            })
            .collect_vec();
        let support =
            Grid3D::from_shape_fn(wave_height, wave_width, rules.len(), |(_, _, pattern)| {
                base[pattern]
            });

        Self {
            rules,
            wave_height,
            wave_width,
            periodic,
            queue: VecDeque::new(),
            support,
        }
    }

    /// Record that `pattern` was just ruled out at `(y, x)`.
    pub(crate) fn enqueue(&mut self, y: usize, x: usize, pattern: usize) {
        *self.support.get_mut(y, x, pattern) = [0; 4];
        self.queue.push_back((y, x, pattern));
    }

    /// The neighbor of `(y, x)` in `direction`, wrapping torically when the
    /// output is periodic and skipping out-of-bounds steps otherwise.
    fn neighbor(&self, y: usize, x: usize, direction: Direction) -> Option<(usize, usize)> {
        if self.periodic {
            let ny = (y as isize + direction.dy()).rem_euclid(self.wave_height as isize);
            let nx = (x as isize + direction.dx()).rem_euclid(self.wave_width as isize);
            Some((ny as usize, nx as usize))
        } else {
            let (ny, nx) = direction.attempt_from(y, x);
            (ny < self.wave_height && nx < self.wave_width).then_some((ny, nx))
        }
    }

    /// Drain the queue, eliminating every pattern that loses its last
    /// support. Stops as soon as some cell runs out of patterns.
    pub(crate) fn propagate(&mut self, wave: &mut Wave) -> Result<(), Contradiction> {
        while let Some((y, x, pattern)) = self.queue.pop_front() {
            for &direction in Direction::VARIANTS {
                let Some((ny, nx)) = self.neighbor(y, x, direction) else {
                    continue;
                };
                let d = direction.index();

                let allowed = &self.rules[pattern][d];
                for &other in allowed {
                    let support = self.support.get_mut(ny, nx, other);
                    support[d] -= 1;
                    if support[d] == 0 {
                        *support = [0; 4];
                        self.queue.push_back((ny, nx, other));
                        wave.forbid(ny * self.wave_width + nx, other);
                        if wave.is_impossible() {
                            self.queue.clear();
                            return Err(Contradiction);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn rules(&self) -> &CompatibilityTable {
        &self.rules
    }

    #[cfg(test)]
    pub(crate) fn support(&self, y: usize, x: usize, pattern: usize) -> [i32; 4] {
        *self.support.get(y, x, pattern)
    }
}
