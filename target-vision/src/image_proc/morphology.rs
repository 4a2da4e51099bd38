//! Grayscale morphology with a disk structuring element.
//!
//! Opening (erosion then dilation) with a disk larger than a bullet hole
//! suppresses the holes and printed fine detail, leaving an estimate of the
//! smooth background / illumination field of the target.
//!
//! Only the interior band `[radius, dim - radius)` on each axis is processed.
//! The outer band of width `radius` is left at 0 in both the eroded
//! intermediate and the final result, so callers must crop or ignore it.
//!
//! The disk is stored as one horizontal span per row offset, which turns the
//! inner loop into a min/max over a 1-D row window. Results are identical to
//! testing `dx² + dy² <= radius²` for every offset.

use ndarray::{s, Array2, ArrayView2};
use tracing::trace;

/// Horizontal extent of a discrete disk.
///
/// Entry `i` is the half-width of the disk on row offset `dy = i - radius`,
/// i.e. the largest `dx` with `dx² + dy² <= radius²`.
pub fn disk_spans(radius: usize) -> Vec<usize> {
    let r2 = radius * radius;
    (0..=2 * radius)
        .map(|i| {
            let dy = i.abs_diff(radius);
            let remaining = r2 - dy * dy;
            let mut half = (remaining as f64).sqrt() as usize;
            // Guard the float root against off-by-one at perfect squares
            while (half + 1) * (half + 1) <= remaining {
                half += 1;
            }
            while half * half > remaining {
                half -= 1;
            }
            half
        })
        .collect()
}

#[derive(Clone, Copy)]
enum Extremum {
    Min,
    Max,
}

fn disk_filter(grid: &ArrayView2<u8>, radius: usize, extremum: Extremum) -> Array2<u8> {
    let (height, width) = grid.dim();
    let mut output = Array2::<u8>::zeros((height, width));
    if height <= 2 * radius || width <= 2 * radius {
        return output;
    }

    let spans = disk_spans(radius);

    for y in radius..height - radius {
        for x in radius..width - radius {
            let mut acc = match extremum {
                Extremum::Min => u8::MAX,
                Extremum::Max => u8::MIN,
            };

            for (i, &half) in spans.iter().enumerate() {
                let window = grid.slice(s![y + i - radius, x - half..=x + half]);
                acc = match extremum {
                    Extremum::Min => window.iter().fold(acc, |a, &v| a.min(v)),
                    Extremum::Max => window.iter().fold(acc, |a, &v| a.max(v)),
                };
            }

            output[[y, x]] = acc;
        }
    }

    output
}

/// Grayscale erosion: minimum over the disk neighbourhood.
pub fn erode_disk(grid: &ArrayView2<u8>, radius: usize) -> Array2<u8> {
    disk_filter(grid, radius, Extremum::Min)
}

/// Grayscale dilation: maximum over the disk neighbourhood.
pub fn dilate_disk(grid: &ArrayView2<u8>, radius: usize) -> Array2<u8> {
    disk_filter(grid, radius, Extremum::Max)
}

/// Morphological opening with a disk of the given radius.
///
/// # Arguments
/// * `grid` - Grayscale image
/// * `radius` - Disk radius in pixels; features narrower than the disk are removed
///
/// # Returns
/// Background estimate with a zeroed outer band of width `radius`; an
/// all-zero grid when the image is no larger than `2 * radius` on either axis
pub fn morphological_opening(grid: &ArrayView2<u8>, radius: usize) -> Array2<u8> {
    trace!("Opening {}x{} grid with radius {}", grid.ncols(), grid.nrows(), radius);
    let eroded = erode_disk(grid, radius);
    dilate_disk(&eroded.view(), radius)
}
