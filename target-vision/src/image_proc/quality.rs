//! No-reference quality metrics for a photographed paper target.
//!
//! [`assess`] is the single entry point the capture flow calls: it locates the
//! dark/light split and reports sharpness, contrast, per-half exposure, dark
//! half visibility and noise as one [`QualityAssessment`]. Nothing here fails;
//! degenerate or featureless photos simply score low, and the quality gate
//! turns low scores into a re-capture request.
//!
//! # Metrics
//!
//! ## Sharpness
//! Population variance of the 4-neighbour Laplacian over interior pixels. A
//! focused photo of printed rings has strong, frequent second derivatives;
//! blur smears them out.
//!
//! ## Contrast
//! Spread between the 5th and 95th intensity percentiles, normalised to [0, 1].
//!
//! ## Exposure and visibility
//! Mean intensity of each half, plus the variance of the dark half (holes and
//! printed rings must stay visible inside the black area).

use ndarray::{s, ArrayView2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::noise::estimate_noise_mad;
use super::segment::{find_transition_with, SegmenterConfig};
use super::stats::{histogram, intensity_at_rank, region_mean, region_variance};

/// Fewest pixels for which percentile contrast is defined.
pub const MIN_CONTRAST_PIXELS: usize = 21;

/// Quality metrics of one photographed target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// Laplacian variance, unbounded above
    pub sharpness: f64,
    /// 5th-95th percentile spread, 0.0 to 1.0
    pub contrast: f64,
    /// Mean intensity of the light half
    pub white_exposure: f64,
    /// Mean intensity of the dark half
    pub black_exposure: f64,
    /// Intensity variance of the dark half
    pub black_visibility: f64,
    /// MAD-based noise estimate
    pub noise_level: f64,
    /// Split column as a fraction of the image width
    pub transition_x: f64,
}

/// Population variance of the discrete Laplacian over interior pixels.
///
/// Returns 0.0 for grids without interior pixels (narrower or shorter than 3).
pub fn laplacian_variance(grid: &ArrayView2<u8>) -> f64 {
    let (height, width) = grid.dim();
    if height < 3 || width < 3 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let laplacian = grid[[y - 1, x]] as i32
                + grid[[y + 1, x]] as i32
                + grid[[y, x - 1]] as i32
                + grid[[y, x + 1]] as i32
                - 4 * grid[[y, x]] as i32;
            let value = laplacian as f64;
            sum += value;
            sum_sq += value * value;
        }
    }

    let count = ((height - 2) * (width - 2)) as f64;
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}

/// Normalised spread between the 5th and 95th intensity percentiles.
///
/// The percentiles are the sorted intensities at indices `n / 20` and
/// `n * 19 / 20`. Grids with fewer than [`MIN_CONTRAST_PIXELS`] pixels report 0.0.
pub fn percentile_contrast(grid: &ArrayView2<u8>) -> f64 {
    let count = grid.len();
    if count < MIN_CONTRAST_PIXELS {
        return 0.0;
    }

    let bins = histogram(grid);
    let p5 = intensity_at_rank(&bins, count / 20);
    let p95 = intensity_at_rank(&bins, count * 19 / 20);
    (p95 as f64 - p5 as f64) / 255.0
}

/// Assess a target photo with the default segmenter tuning.
pub fn assess(grid: &ArrayView2<u8>) -> QualityAssessment {
    assess_with(grid, &SegmenterConfig::default())
}

/// Assess a target photo.
///
/// The dark half is every column left of the transition, the light half the
/// transition column and everything right of it. Sharpness, contrast and
/// noise are measured over the whole grid.
///
/// # Arguments
/// * `grid` - Grayscale target image
/// * `segmenter` - Tuning for the dark/light split search
///
/// # Returns
/// The metrics record; never fails
pub fn assess_with(grid: &ArrayView2<u8>, segmenter: &SegmenterConfig) -> QualityAssessment {
    let width = grid.ncols();
    let transition = find_transition_with(grid, segmenter).min(width);

    let black_region = grid.slice(s![.., ..transition]);
    let white_region = grid.slice(s![.., transition..]);

    let assessment = QualityAssessment {
        sharpness: laplacian_variance(grid),
        contrast: percentile_contrast(grid),
        white_exposure: region_mean(&white_region),
        black_exposure: region_mean(&black_region),
        black_visibility: region_variance(&black_region),
        noise_level: estimate_noise_mad(grid),
        transition_x: if width == 0 {
            0.0
        } else {
            transition as f64 / width as f64
        },
    };

    debug!(
        "Assessed {}x{} target: sharpness {:.1}, contrast {:.3}, exposure {:.1}/{:.1}, noise {:.2}, split {:.3}",
        width,
        grid.nrows(),
        assessment.sharpness,
        assessment.contrast,
        assessment.black_exposure,
        assessment.white_exposure,
        assessment.noise_level,
        assessment.transition_x
    );

    assessment
}
