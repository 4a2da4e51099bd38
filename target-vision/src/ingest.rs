//! Grayscale ingestion of decoded photos.
//!
//! Turns an already-decoded `image::DynamicImage` into the single channel
//! [`PixelGrid`] every other stage consumes. Photos are proportionally
//! downscaled so the longer edge never exceeds [`MAX_DIMENSION`], which bounds
//! the cost of every later pass over the grid.
//!
//! The luma conversion is the `image` crate's `to_luma8`, applied directly to
//! the encoded sample values (no gamma linearisation). Sharpness and contrast
//! values are only comparable between grids produced by the same path.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::image_size::ImageSize;
use crate::PixelGrid;

/// Longest permitted edge of an ingested grid, in pixels.
pub const MAX_DIMENSION: usize = 1200;

/// Convert a decoded image into a grayscale grid no larger than [`MAX_DIMENSION`].
pub fn grid_from_image(image: &DynamicImage) -> PixelGrid {
    grid_from_image_bounded(image, MAX_DIMENSION)
}

/// Convert a decoded image into a grayscale grid with a custom edge bound.
///
/// # Arguments
/// * `image` - Decoded source image, any colour type
/// * `max_edge` - Upper bound for the longer edge of the result
///
/// # Returns
/// A `(height, width)` grid of 8-bit intensities
pub fn grid_from_image_bounded(image: &DynamicImage, max_edge: usize) -> PixelGrid {
    let source = ImageSize::from_width_height(image.width() as usize, image.height() as usize);
    let target = source.fit_within(max_edge);

    let gray = if target == source {
        image.to_luma8()
    } else {
        debug!(
            "Downscaling {} photo ({} px) to {} ({} px)",
            source,
            source.pixel_count(),
            target,
            target.pixel_count()
        );
        image
            .resize_exact(target.width as u32, target.height as u32, FilterType::Triangle)
            .to_luma8()
    };

    grid_from_gray(&gray)
}

/// Copy a `GrayImage` into a grid without resizing; pixel `(x, y)` becomes `[[y, x]]`.
pub fn grid_from_gray(image: &GrayImage) -> PixelGrid {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        image.get_pixel(x as u32, y as u32)[0]
    })
}

/// Grid to `GrayImage`, for writing preprocessed outputs as PNG.
///
/// Inverse of [`grid_from_gray`]: element `[[y, x]]` lands on pixel `(x, y)`.
pub fn gray_from_grid(grid: &ArrayView2<u8>) -> GrayImage {
    let (height, width) = grid.dim();
    let mut img = GrayImage::new(width as u32, height as u32);

    for ((y, x), &value) in grid.indexed_iter() {
        img.put_pixel(x as u32, y as u32, Luma([value]));
    }

    img
}
