//! Tile-local contrast limited histogram equalization (CLAHE).
//!
//! The grid is cut into `tile_size` squares; every tile is equalized through
//! its own clipped-histogram lookup table. Tiles are processed independently
//! and there is no bilinear blending between neighbouring tables, so strong
//! illumination gradients can leave visible tile seams. The hole detector only
//! looks at local structure and tolerates this.
//!
//! Two properties are intentional and covered by tests:
//! - the clipped excess is redistributed as `clipped / 256` per bin with
//!   integer division, so up to 255 counts per tile are simply dropped;
//! - the transform is not idempotent, equalizing an equalized grid changes it
//!   again.

use ndarray::{s, Array2, ArrayView2, ArrayViewMut2};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// CLAHE tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaheConfig {
    /// Per-bin cap as a multiple of the uniform bin height
    pub clip_limit: f64,
    /// Nominal tile edge in pixels; trailing pixels join the last tile
    pub tile_size: usize,
}

impl Default for ClaheConfig {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tile_size: 32,
        }
    }
}

/// Half-open pixel ranges of the tiles along one axis.
///
/// There are `max(1, len / tile_size)` tiles; the final one is stretched to
/// the end of the axis so no pixel is left out.
pub fn tile_bounds(len: usize, tile_size: usize) -> Vec<(usize, usize)> {
    let tile_size = tile_size.max(1);
    let tiles = (len / tile_size).max(1);

    (0..tiles)
        .map(|t| {
            let start = (t * tile_size).min(len);
            let end = if t + 1 == tiles {
                len
            } else {
                ((t + 1) * tile_size).min(len)
            };
            (start, end)
        })
        .collect()
}

/// Build the remapping table for one tile.
///
/// # Arguments
/// * `histogram` - 256-bin intensity histogram of the tile
/// * `pixel_count` - Number of pixels in the tile
/// * `clip_limit` - Per-bin cap as a multiple of `pixel_count / 256`
///
/// # Returns
/// A non-decreasing lookup table from input to output intensity
pub fn tile_lut(histogram: &[u32; 256], pixel_count: usize, clip_limit: f64) -> [u8; 256] {
    let clip_threshold = (clip_limit * pixel_count as f64 / 256.0).floor().max(0.0) as u64;

    let mut bins = [0u64; 256];
    let mut clipped = 0u64;
    for (bin, &count) in bins.iter_mut().zip(histogram.iter()) {
        let count = count as u64;
        if count > clip_threshold {
            clipped += count - clip_threshold;
            *bin = clip_threshold;
        } else {
            *bin = count;
        }
    }

    // Remainder of the integer division is dropped
    let redistribute = clipped / 256;

    let mut cdf = [0i64; 256];
    let mut running = 0i64;
    for (entry, &bin) in cdf.iter_mut().zip(bins.iter()) {
        running += (bin + redistribute) as i64;
        *entry = running;
    }

    let cdf_min = cdf.iter().copied().find(|&c| c != 0).unwrap_or(0);
    let denominator = (pixel_count as i64 - cdf_min).max(1);

    let mut lut = [0u8; 256];
    for (out, &c) in lut.iter_mut().zip(cdf.iter()) {
        let scaled = (c - cdf_min) * 255;
        *out = scaled.div_euclid(denominator).clamp(0, 255) as u8;
    }
    lut
}

/// Equalize a caller-owned grid in place.
pub fn equalize_in_place(grid: &mut ArrayViewMut2<u8>, config: &ClaheConfig) {
    let (height, width) = grid.dim();
    if height == 0 || width == 0 {
        return;
    }

    let rows = tile_bounds(height, config.tile_size);
    let cols = tile_bounds(width, config.tile_size);
    trace!(
        "CLAHE over {}x{} tiles (clip {:.2}, tile {})",
        cols.len(),
        rows.len(),
        config.clip_limit,
        config.tile_size
    );

    for &(y0, y1) in &rows {
        for &(x0, x1) in &cols {
            let mut tile = grid.slice_mut(s![y0..y1, x0..x1]);

            let mut histogram = [0u32; 256];
            for &v in tile.iter() {
                histogram[v as usize] += 1;
            }

            let lut = tile_lut(&histogram, tile.len(), config.clip_limit);
            tile.mapv_inplace(|v| lut[v as usize]);
        }
    }
}

/// Equalize a grid, returning a new grid and leaving the input untouched.
///
/// # Example
/// ```
/// use ndarray::Array2;
/// use target_vision::image_proc::clahe::{equalize, ClaheConfig};
///
/// let grid = Array2::from_shape_fn((64, 64), |(y, x)| ((x + y) / 2) as u8);
/// let enhanced = equalize(&grid.view(), &ClaheConfig::default());
/// assert_eq!(enhanced.dim(), grid.dim());
/// ```
pub fn equalize(grid: &ArrayView2<u8>, config: &ClaheConfig) -> Array2<u8> {
    let mut output = grid.to_owned();
    equalize_in_place(&mut output.view_mut(), config);
    output
}
