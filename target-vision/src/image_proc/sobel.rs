//! Sobel gradient magnitude for hole boundary extraction.

use ndarray::{Array2, ArrayView2};

/// Default divisor mapping raw Sobel magnitudes into the 8-bit range.
///
/// A full 0 to 255 step produces a magnitude of 1020; dividing by 4 maps it
/// to 255.
pub const SOBEL_MAGNITUDE_SCALE: f64 = 4.0;

/// Sobel edge map with the default magnitude scale.
pub fn sobel_edges(grid: &ArrayView2<u8>) -> Array2<u8> {
    sobel_edges_scaled(grid, SOBEL_MAGNITUDE_SCALE)
}

/// Sobel edge map: `floor(sqrt(gx² + gy²) / scale)` clamped to 0..=255.
///
/// Border pixels have no full 3x3 neighbourhood and are left at 0.
///
/// # Arguments
/// * `grid` - Grayscale image
/// * `scale` - Divisor applied to the gradient magnitude
pub fn sobel_edges_scaled(grid: &ArrayView2<u8>, scale: f64) -> Array2<u8> {
    let (height, width) = grid.dim();
    let mut edges = Array2::<u8>::zeros((height, width));
    if height < 3 || width < 3 {
        return edges;
    }

    let p = |y: usize, x: usize| grid[[y, x]] as i32;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let gx = (p(y - 1, x + 1) + 2 * p(y, x + 1) + p(y + 1, x + 1))
                - (p(y - 1, x - 1) + 2 * p(y, x - 1) + p(y + 1, x - 1));
            let gy = (p(y + 1, x - 1) + 2 * p(y + 1, x) + p(y + 1, x + 1))
                - (p(y - 1, x - 1) + 2 * p(y - 1, x) + p(y - 1, x + 1));

            let magnitude = ((gx * gx + gy * gy) as f64).sqrt();
            edges[[y, x]] = (magnitude / scale).floor().clamp(0.0, 255.0) as u8;
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{step_target, uniform_grid};
    use ndarray::s;

    #[test]
    fn test_uniform_has_no_edges() {
        let edges = sobel_edges(&uniform_grid(20, 15, 180).view());
        assert!(edges.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_vertical_step_response() {
        // 0 -> 200 step at column 5: columns 4 and 5 see gx = 4 * 200
        let edges = sobel_edges(&step_target(10, 6, 5, 0, 200).view());
        assert!(edges.slice(s![1..5, 4..6]).iter().all(|&v| v == 200));
        assert!(edges.slice(s![1..5, 1..4]).iter().all(|&v| v == 0));
        assert!(edges.slice(s![1..5, 6..9]).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_border_is_zero() {
        let grid = Array2::from_shape_fn((8, 8), |(y, x)| ((x * 31 + y * 17) % 256) as u8);
        let edges = sobel_edges(&grid.view());
        assert!(edges.row(0).iter().all(|&v| v == 0));
        assert!(edges.row(7).iter().all(|&v| v == 0));
        assert!(edges.column(0).iter().all(|&v| v == 0));
        assert!(edges.column(7).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_scale_is_overridable_and_clamped() {
        let grid = step_target(10, 6, 5, 0, 255);
        // Magnitude 1020: default scale gives 255, scale 1 saturates
        assert_eq!(sobel_edges(&grid.view())[[2, 5]], 255);
        assert_eq!(sobel_edges_scaled(&grid.view(), 1.0)[[2, 5]], 255);
        assert_eq!(sobel_edges_scaled(&grid.view(), 8.0)[[2, 5]], 127);
    }

    #[test]
    fn test_small_grid_is_all_zero() {
        let edges = sobel_edges(&step_target(2, 9, 1, 0, 255).view());
        assert_eq!(edges.dim(), (9, 2));
        assert!(edges.iter().all(|&v| v == 0));
    }
}
