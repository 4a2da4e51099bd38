//! Synthetic target grids for tests, benches and demos.
//!
//! All generators are deterministic; the noisy variants take an explicit seed.

use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::PixelGrid;

/// Dark level of [`noisy_step_target`].
pub const SYNTHETIC_BLACK: u8 = 40;

/// Light level of [`noisy_step_target`].
pub const SYNTHETIC_WHITE: u8 = 200;

/// Grid filled with a single intensity.
pub fn uniform_grid(width: usize, height: usize, value: u8) -> PixelGrid {
    Array2::from_elem((height, width), value)
}

/// Two-level target: columns `[0, split)` at `left`, the rest at `right`.
pub fn step_target(width: usize, height: usize, split: usize, left: u8, right: u8) -> PixelGrid {
    Array2::from_shape_fn((height, width), |(_, x)| if x < split { left } else { right })
}

/// Add clamped Gaussian noise to every pixel of a grid.
pub fn add_gaussian_noise(grid: &mut PixelGrid, std_dev: f64, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let Ok(normal) = Normal::new(0.0, std_dev) else {
        return;
    };

    grid.mapv_inplace(|v| {
        let noisy = v as f64 + normal.sample(&mut rng);
        noisy.round().clamp(0.0, 255.0) as u8
    });
}

/// Step target split at `width / 2` with Gaussian sensor noise.
///
/// The dark half sits at [`SYNTHETIC_BLACK`] and the light half at
/// [`SYNTHETIC_WHITE`], far enough from the range limits that moderate noise
/// is not clipped.
pub fn noisy_step_target(width: usize, height: usize, std_dev: f64, seed: u64) -> PixelGrid {
    let mut grid = step_target(width, height, width / 2, SYNTHETIC_BLACK, SYNTHETIC_WHITE);
    add_gaussian_noise(&mut grid, std_dev, seed);
    grid
}

/// Photographed-target stand-in: noisy step with dark "holes" punched into
/// the light half and light rings printed on the dark half.
pub fn synthetic_target(width: usize, height: usize, std_dev: f64, seed: u64) -> PixelGrid {
    let mut grid = step_target(width, height, width / 2, SYNTHETIC_BLACK, SYNTHETIC_WHITE);

    let cx = width as f64 / 4.0;
    let cy = height as f64 / 2.0;
    let ring_radius = width.min(height) as f64 / 6.0;

    for ((y, x), v) in grid.indexed_iter_mut() {
        let (fx, fy) = (x as f64, y as f64);

        // Printed ring on the dark half
        let r = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt();
        if (r - ring_radius).abs() < 1.5 {
            *v = 150;
        }

        // Holes on the light half, 3 px radius on a coarse lattice
        if x >= width / 2 + 8 {
            let hx = (x - width / 2) % 24;
            let hy = y % 24;
            if (hx as i64 - 12).pow(2) + (hy as i64 - 12).pow(2) <= 9 {
                *v = 25;
            }
        }
    }

    add_gaussian_noise(&mut grid, std_dev, seed);
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_target_layout() {
        let grid = step_target(6, 2, 4, 1, 9);
        assert_eq!(grid.dim(), (2, 6));
        assert_eq!(grid.row(1).to_vec(), vec![1, 1, 1, 1, 9, 9]);
    }

    #[test]
    fn test_noise_is_deterministic() {
        let a = noisy_step_target(40, 30, 5.0, 3);
        let b = noisy_step_target(40, 30, 5.0, 3);
        let c = noisy_step_target(40, 30, 5.0, 4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_noise_leaves_grid_unchanged() {
        let mut grid = step_target(10, 10, 5, 40, 200);
        let expected = grid.clone();
        add_gaussian_noise(&mut grid, 0.0, 1);
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_synthetic_target_has_features_on_both_halves() {
        let grid = synthetic_target(240, 180, 0.0, 1);
        let left_ring = grid.slice(ndarray::s![.., ..120]).iter().filter(|&&v| v == 150).count();
        let right_holes = grid.slice(ndarray::s![.., 120..]).iter().filter(|&&v| v == 25).count();
        assert!(left_ring > 100);
        assert!(right_holes > 100);
    }
}
