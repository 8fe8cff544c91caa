use std::hash::Hash;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Error;
use crate::grid::Grid2D;
use crate::overlapping::{Overlapping, OverlappingOptions};
use crate::solver::Contradiction;
use crate::tiling::{TileSet, Tiling, TilingOptions};

/// How many attempts a runner makes before reporting
/// [`Exhausted`](Error::Exhausted).
pub const MAX_ATTEMPTS: u32 = 10;

/// Solve an overlapping instance, retrying with fresh seeds on
/// contradiction.
///
/// Attempt seeds are drawn from a generator seeded with `seed`, so the whole
/// run, retries included, is reproducible from it.
pub fn run_overlapping<T: Clone + Eq + Hash>(
    input: &Grid2D<T>,
    options: OverlappingOptions,
    seed: u64,
) -> Result<Grid2D<T>, Error> {
    let mut seeder = StdRng::seed_from_u64(seed);
    for attempt in 0..MAX_ATTEMPTS {
        let instance = Overlapping::new(input, options, seeder.gen());
        match instance.solve() {
            Ok(output) => return Ok(output),
            Err(Contradiction) => debug!("attempt {attempt} ended in a contradiction"),
        }
    }
    warn!("giving up after {MAX_ATTEMPTS} attempts");
    Err(Error::Exhausted {
        attempts: MAX_ATTEMPTS,
    })
}

/// Solve a tiling instance, retrying with fresh seeds on contradiction.
///
/// Attempt seeds are drawn from a generator seeded with `seed`, so the whole
/// run, retries included, is reproducible from it.
pub fn run_tiling<T: Clone>(
    set: &TileSet<T>,
    options: TilingOptions,
    seed: u64,
) -> Result<Grid2D<T>, Error> {
    let mut seeder = StdRng::seed_from_u64(seed);
    for attempt in 0..MAX_ATTEMPTS {
        let instance = Tiling::new(set, options, seeder.gen())?;
        match instance.solve() {
            Ok(output) => return Ok(output),
            Err(Contradiction) => debug!("attempt {attempt} ended in a contradiction"),
        }
    }
    warn!("giving up after {MAX_ATTEMPTS} attempts");
    Err(Error::Exhausted {
        attempts: MAX_ATTEMPTS,
    })
}
