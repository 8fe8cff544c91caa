use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use ndarray::{Array2, Array3};

/// A fixed-size 2D container in row-major order (`x` innermost).
///
/// Grids never resize after construction. [`reflected`](Grid2D::reflected)
/// and [`rotated`](Grid2D::rotated) return new grids;
/// [`sub_grid`](Grid2D::sub_grid) samples torically. Equality requires
/// identical dimensions; the [`Hash`] impl folds element hashes in row-major
/// order with a fixed mixer so that pattern deduplication is reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid2D<T> {
    cells: Array2<T>,
}

impl<T: Eq> Eq for Grid2D<T> {}

impl<T> Grid2D<T> {
    /// Height of the grid.
    #[inline]
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Width of the grid.
    #[inline]
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// The element in the `y`-th row and `x`-th column.
    #[inline]
    pub fn get(&self, y: usize, x: usize) -> &T {
        debug_assert!(y < self.height() && x < self.width());
        &self.cells[[y, x]]
    }

    /// Iterate over all elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Build a grid by evaluating `f` at every `(y, x)`.
    pub fn from_shape_fn(height: usize, width: usize, f: impl FnMut((usize, usize)) -> T) -> Self {
        Self {
            cells: Array2::from_shape_fn((height, width), f),
        }
    }
}

impl<T: Clone> Grid2D<T> {
    /// Build a grid with every element set to `value`.
    pub fn filled(height: usize, width: usize, value: T) -> Self {
        Self {
            cells: Array2::from_elem((height, width), value),
        }
    }

    /// The grid flipped along its vertical axis.
    pub fn reflected(&self) -> Self {
        Self::from_shape_fn(self.height(), self.width(), |(y, x)| {
            self.get(y, self.width() - 1 - x).clone()
        })
    }

    /// The grid rotated 90° counter-clockwise; dimensions swap.
    pub fn rotated(&self) -> Self {
        Self::from_shape_fn(self.width(), self.height(), |(y, x)| {
            self.get(x, self.width() - 1 - y).clone()
        })
    }

    /// The `height`x`width` sub-grid whose top-left corner is `(y, x)`,
    /// sampled torically: indices are reduced modulo the grid dimensions.
    pub fn sub_grid(&self, y: usize, x: usize, height: usize, width: usize) -> Self {
        Self::from_shape_fn(height, width, |(ky, kx)| {
            self.get((y + ky) % self.height(), (x + kx) % self.width())
                .clone()
        })
    }
}

impl<T: Hash> Hash for Grid2D<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut seed = self.cells.len() as u64;
        for element in self.cells.iter() {
            let mut hasher = DefaultHasher::new();
            element.hash(&mut hasher);
            seed ^= hasher
                .finish()
                .wrapping_add(0x9e37_79b9)
                .wrapping_add(seed << 6)
                .wrapping_add(seed >> 2);
        }
        state.write_u64(seed);
    }
}

/// A fixed-size 3D container; the innermost stride is the third axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid3D<T> {
    cells: Array3<T>,
}

impl<T> Grid3D<T> {
    /// The element at depth `z` of row `y`, column `x`.
    #[inline]
    pub fn get(&self, y: usize, x: usize, z: usize) -> &T {
        &self.cells[[y, x, z]]
    }

    /// Mutable access to the element at depth `z` of row `y`, column `x`.
    #[inline]
    pub fn get_mut(&mut self, y: usize, x: usize, z: usize) -> &mut T {
        &mut self.cells[[y, x, z]]
    }

    /// Build a grid by evaluating `f` at every `(y, x, z)`.
    pub fn from_shape_fn(
        height: usize,
        width: usize,
        depth: usize,
        f: impl FnMut((usize, usize, usize)) -> T,
    ) -> Self {
        Self {
            cells: Array3::from_shape_fn((height, width, depth), f),
        }
    }
}

impl<T: Clone> Grid3D<T> {
    /// Build a grid with every element set to `value`.
    pub fn filled(height: usize, width: usize, depth: usize, value: T) -> Self {
        Self {
            cells: Array3::from_elem((height, width, depth), value),
        }
    }
}
