//! Image dimensions and size utilities

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Image dimensions structure
///
/// Represents the width and height of a decoded photo or pixel grid.
/// Provides convenience methods for pixel counts and proportional downscales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
}

impl ImageSize {
    /// Create a new ImageSize
    pub fn from_width_height(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Size of an existing grid.
    ///
    /// Grids are stored `(height, width)`, so the axes are swapped here.
    pub fn of_grid(grid: &ArrayView2<u8>) -> Self {
        let (height, width) = grid.dim();
        Self { width, height }
    }

    /// Get total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Length of the longer edge
    pub fn longer_edge(&self) -> usize {
        self.width.max(self.height)
    }

    /// Proportionally shrink so that the longer edge is at most `max_edge`.
    ///
    /// Sizes already within bounds come back unchanged; images are never
    /// upscaled. Each scaled edge is rounded and kept at least one pixel.
    ///
    /// # Arguments
    /// * `max_edge` - Upper bound for the longer edge in pixels
    ///
    /// # Returns
    /// The downscaled size with the original aspect ratio
    pub fn fit_within(&self, max_edge: usize) -> Self {
        let longer = self.longer_edge();
        if longer <= max_edge || longer == 0 {
            return *self;
        }

        let scale = max_edge as f64 / longer as f64;
        let shrink = |edge: usize| ((edge as f64 * scale).round() as usize).clamp(1, max_edge.max(1));

        Self {
            width: shrink(self.width),
            height: shrink(self.height),
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_of_grid_swaps_axes() {
        let grid = Array2::<u8>::zeros((30, 40));
        let size = ImageSize::of_grid(&grid.view());
        assert_eq!(size.width, 40);
        assert_eq!(size.height, 30);
        assert_eq!(size.pixel_count(), 1200);
        assert_eq!(size.to_string(), "40x30");
    }

    #[test]
    fn test_fit_within_keeps_small_sizes() {
        let size = ImageSize::from_width_height(800, 600);
        assert_eq!(size.fit_within(1200), size);

        let exact = ImageSize::from_width_height(1200, 900);
        assert_eq!(exact.fit_within(1200), exact);
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let landscape = ImageSize::from_width_height(4000, 3000).fit_within(1200);
        assert_eq!(landscape, ImageSize::from_width_height(1200, 900));

        let portrait = ImageSize::from_width_height(3024, 4032).fit_within(1200);
        assert_eq!(portrait, ImageSize::from_width_height(900, 1200));
    }

    #[test]
    fn test_fit_within_never_collapses_an_edge() {
        let sliver = ImageSize::from_width_height(10_000, 2).fit_within(1200);
        assert_eq!(sliver.width, 1200);
        assert_eq!(sliver.height, 1);
    }
}
