//! Robust noise estimation for paper target photos.
//!
//! Sensor and compression noise is estimated from the raw response of the
//! 4-neighbour Laplacian on a sparse lattice of pixels. The Laplacian removes
//! flat shading, leaving mostly noise plus a minority of edge responses; the
//! median absolute deviation (MAD) of those responses ignores the edges.
//!
//! # Algorithm
//! 1. Sample every [`SAMPLE_STRIDE`]th pixel on both axes, starting at
//!    [`SAMPLE_MARGIN`], staying within rows/cols `[2, dim - 3]`
//! 2. Sample value: `|top + bottom + left + right - 4 * center|`
//! 3. Median of the samples, then median of absolute deviations from it
//! 4. Scale the MAD by [`MAD_SCALE`]
//!
//! Note the final step divides by the Gaussian consistency constant rather
//! than multiplying by it. The resulting level is what downstream quality
//! thresholds are tuned against.

use ndarray::ArrayView2;

use super::stats::upper_median;

/// Gaussian consistency constant for the median absolute deviation.
pub const MAD_SCALE: f64 = 1.4826;

/// Distance between sampled pixels along each axis.
pub const SAMPLE_STRIDE: usize = 4;

/// First sampled row/column; also the excluded band at the far edges.
pub const SAMPLE_MARGIN: usize = 2;

/// Raw Laplacian magnitudes on the sparse sampling lattice.
///
/// Returns an empty vector when the grid is smaller than 5x5.
pub fn laplacian_samples(grid: &ArrayView2<u8>) -> Vec<f64> {
    let (height, width) = grid.dim();
    let row_end = height.saturating_sub(SAMPLE_MARGIN);
    let col_end = width.saturating_sub(SAMPLE_MARGIN);

    let mut samples = Vec::new();
    for y in (SAMPLE_MARGIN..row_end).step_by(SAMPLE_STRIDE) {
        for x in (SAMPLE_MARGIN..col_end).step_by(SAMPLE_STRIDE) {
            let center = grid[[y, x]] as i32;
            let neighbours = grid[[y - 1, x]] as i32
                + grid[[y + 1, x]] as i32
                + grid[[y, x - 1]] as i32
                + grid[[y, x + 1]] as i32;
            samples.push((neighbours - 4 * center).abs() as f64);
        }
    }
    samples
}

/// Estimate the noise level of a grayscale image.
///
/// # Arguments
/// * `grid` - Grayscale image
///
/// # Returns
/// `MAD / 1.4826` of the sampled Laplacian magnitudes, or 0.0 when the grid
/// is too small to sample
///
/// # Example
/// ```
/// use ndarray::Array2;
/// use target_vision::image_proc::noise::estimate_noise_mad;
///
/// let flat = Array2::<u8>::from_elem((32, 32), 140);
/// assert_eq!(estimate_noise_mad(&flat.view()), 0.0);
/// ```
pub fn estimate_noise_mad(grid: &ArrayView2<u8>) -> f64 {
    let mut samples = laplacian_samples(grid);
    if samples.is_empty() {
        return 0.0;
    }

    let median = upper_median(&mut samples);
    let mut deviations: Vec<f64> = samples.iter().map(|&s| (s - median).abs()).collect();
    let mad = upper_median(&mut deviations);

    mad / MAD_SCALE
}
