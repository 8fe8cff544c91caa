//! PNG decoding and encoding for grids of [`Color`]s.
//!
//! This is the only part of the crate that touches the filesystem; the
//! solver itself only ever sees grids.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::color::Color;
use crate::error::Error;
use crate::grid::Grid2D;

/// Decode the image at `path` into a grid of colors, discarding any alpha.
pub fn read_png(path: impl AsRef<Path>) -> Result<Grid2D<Color>, Error> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|source| Error::Resource {
            path: path.to_owned(),
            source,
        })?
        .into_rgb8();
    Ok(Grid2D::from_shape_fn(
        image.height() as usize,
        image.width() as usize,
        |(y, x)| Color::from(image.get_pixel(x as u32, y as u32).0),
    ))
}

/// Encode `grid` as a PNG at `path`.
pub fn write_png(path: impl AsRef<Path>, grid: &Grid2D<Color>) -> Result<(), Error> {
    let path = path.as_ref();
    let image = RgbImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        let color = grid.get(y as usize, x as usize);
        Rgb([color.r, color.g, color.b])
    });
    image.save(path).map_err(|source| Error::Output {
        path: path.to_owned(),
        source,
    })
}
