#![warn(missing_docs)]

//! # `collapsar`
//!
//! A solver for the [Wave Function Collapse](https://github.com/mxgmn/WaveFunctionCollapse) family of texture-synthesis problems.
//! Two problem modes share one solver: in [overlapping](crate::Overlapping) mode, patterns are NxN windows sampled from an example image and adjacency is implied by overlap agreement;
//! in [tiling](crate::Tiling) mode, patterns are oriented variants of named tiles and adjacency is enumerated explicitly.
//! Both modes decode a solved wave into a [`Grid2D`] of cells (usually [`Color`]s), which [`io`] can write back out as a PNG.
//!
//! Begin with an adapter: construct an [`Overlapping`] from an example image and [`OverlappingOptions`], or build a [`TileSet`] with a [`TileSetBuilder`] and hand it to [`Tiling`].
//! Call `solve()`, consuming the adapter and yielding the output grid or a [`Contradiction`].
//! Since the algorithm is allowed to fail, the usual entry points are [`run_overlapping`] and [`run_tiling`], which retry with fresh seeds before giving up.
//!
//! # Internals
//! Every output cell starts in a superposition of all patterns.
//! The solver repeatedly *observes* the unfinished cell with the least Shannon entropy, collapsing it to a single pattern sampled by the weights observed in the input, then *propagates*: patterns that just lost their last supporting neighbor are eliminated, transitively, until a fixed point.
//! If some cell runs out of patterns the attempt is a contradiction; otherwise every cell ends with exactly one pattern and the wave decodes into output.
//!
//! Propagation is counter-based in the manner of [fast-wfc](https://github.com/math-fehr/fast-wfc): for each cell, pattern, and direction the solver keeps the number of patterns still possible in the neighboring cell that support this pattern, so each elimination costs a handful of decrements rather than a set intersection.
//!
//! All state is owned by one solver instance and every random choice flows from one seed, so runs are reproducible; run several instances with distinct seeds to parallelize.

pub use color::Color;
pub use direction::Direction;
pub use error::Error;
pub use grid::{Grid2D, Grid3D};
pub use overlapping::{Overlapping, OverlappingOptions};
pub use runner::{run_overlapping, run_tiling, MAX_ATTEMPTS};
pub use solver::{CompatibilityTable, Contradiction, Solver};
pub use tiling::{Adjacency, Symmetry, Tile, TileSet, TileSetBuilder, Tiling, TilingOptions};

pub(crate) mod color;
pub(crate) mod direction;
mod tests;
pub(crate) mod error;
pub(crate) mod grid;
pub mod io;
pub(crate) mod overlapping;
pub(crate) mod propagator;
pub(crate) mod runner;
pub(crate) mod solver;
pub(crate) mod tiling;
pub(crate) mod wave;
