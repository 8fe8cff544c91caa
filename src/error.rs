use std::path::PathBuf;

use thiserror::Error;

use crate::tiling::Symmetry;

/// Fatal, per-instance failures.
///
/// A solver [`Contradiction`](crate::Contradiction) is not an `Error`: it is
/// an expected outcome of a single attempt, carried as a status, and only
/// becomes [`Exhausted`](Error::Exhausted) once the retry budget runs out.
#[derive(Debug, Error)]
pub enum Error {
    /// An input image is missing or malformed.
    #[error("failed to read image {path:?}")]
    Resource {
        /// The offending path.
        path: PathBuf,
        /// The underlying decoder failure.
        #[source]
        source: image::ImageError,
    },

    /// An output image could not be written.
    #[error("failed to write image {path:?}")]
    Output {
        /// The offending path.
        path: PathBuf,
        /// The underlying encoder failure.
        #[source]
        source: image::ImageError,
    },

    /// A tile image does not match the size its tile set declares.
    #[error("tile {name:?} is {height}x{width} but the set declares {size}x{size} tiles")]
    Shape {
        /// Name of the offending tile.
        name: String,
        /// Height of the supplied image.
        height: usize,
        /// Width of the supplied image.
        width: usize,
        /// The declared side length.
        size: usize,
    },

    /// A pre-oriented tile supplied the wrong number of orientation images.
    #[error("tile {name:?} supplies {got} orientations but symmetry {symmetry} has {expected}")]
    VariantCount {
        /// Name of the offending tile.
        name: String,
        /// How many images were supplied.
        got: usize,
        /// How many the symmetry class dictates.
        expected: usize,
        /// The declared symmetry class.
        symmetry: Symmetry,
    },

    /// An unknown symmetry token.
    #[error("{0:?} is not a symmetry token")]
    Symmetry(String),

    /// A subset name that the tile set does not declare.
    #[error("subset {0:?} is not declared by the tile set")]
    Subset(String),

    /// A neighbor string whose orientation part is not an integer.
    #[error("orientation in {0:?} is not an integer")]
    Orientation(String),

    /// A tile set with no tiles left to place.
    #[error("the tile set has no tiles")]
    EmptyTileSet,

    /// Every attempt ended in a contradiction.
    #[error("no solution after {attempts} attempts")]
    Exhausted {
        /// How many attempts were made.
        attempts: u32,
    },
}
