//! Dark/light half segmentation of a paper target.
//!
//! The target is photographed with its dark half on one side and its light
//! half on the other. The split is located as the column with the steepest
//! step in per-column mean intensity, measured with a short window of column
//! means on each side. Images with no convincing step fall back to the centre
//! column, i.e. a uniform target is assumed.

use ndarray::{s, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::stats::region_mean;

/// Tuning for the transition search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Maximum number of column means averaged on each side of a candidate
    pub window: usize,
    /// Minimum step (intensity units) accepted as a real transition
    pub min_gradient: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            window: 10,
            min_gradient: 30.0,
        }
    }
}

/// Mean intensity of every column, averaged over all rows.
pub fn column_means(grid: &ArrayView2<u8>) -> Vec<f64> {
    let height = grid.nrows();
    if height == 0 {
        return vec![0.0; grid.ncols()];
    }

    grid.axis_iter(Axis(1))
        .map(|column| column.iter().map(|&v| v as u64).sum::<u64>() as f64 / height as f64)
        .collect()
}

/// Find the column separating the dark half from the light half.
pub fn find_transition(grid: &ArrayView2<u8>) -> usize {
    find_transition_with(grid, &SegmenterConfig::default())
}

/// Find the dark/light transition column with explicit tuning.
///
/// Each interior column `x` is scored by `|mean(right) - mean(left)|` where
/// the left window covers column means `[x - w, x)` and the right window
/// `[x, x + w)`, with `w = min(window, x, width - x - 1)`. The first column
/// with the strictly largest score wins.
///
/// # Arguments
/// * `grid` - Grayscale target image
/// * `config` - Window size and minimum accepted gradient
///
/// # Returns
/// The transition column, or `width / 2` when the best score is below
/// `config.min_gradient` (or the grid is too narrow to have interior columns)
pub fn find_transition_with(grid: &ArrayView2<u8>, config: &SegmenterConfig) -> usize {
    let width = grid.ncols();
    let fallback = width / 2;
    let means = column_means(grid);

    let mut best_column = fallback;
    let mut best_gradient = 0.0f64;

    for x in 1..width.saturating_sub(1) {
        let window = config.window.min(x).min(width - x - 1).max(1);
        let left = window_mean(&means[x - window..x]);
        let right = window_mean(&means[x..x + window]);
        let gradient = (right - left).abs();

        if gradient > best_gradient {
            best_gradient = gradient;
            best_column = x;
        }
    }

    if best_gradient < config.min_gradient {
        trace!(
            "No transition above {:.1} (best {:.1}), assuming centre column {}",
            config.min_gradient,
            best_gradient,
            fallback
        );
        return fallback;
    }

    trace!(
        "Transition at column {} with gradient {:.1}",
        best_column,
        best_gradient
    );
    best_column
}

fn window_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// True when the region left of `transition_x` is darker than the region right of it.
///
/// `transition_x` is clamped to the grid width.
pub fn is_left_side_black(grid: &ArrayView2<u8>, transition_x: usize) -> bool {
    let split = transition_x.min(grid.ncols());
    let left = grid.slice(s![.., ..split]);
    let right = grid.slice(s![.., split..]);
    region_mean(&left) < region_mean(&right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{step_target, uniform_grid};
    use ndarray::Array2;

    #[test]
    fn test_hard_step_is_found_exactly() {
        let grid = step_target(100, 100, 50, 10, 200);
        assert_eq!(find_transition(&grid.view()), 50);
        assert!(is_left_side_black(&grid.view(), 50));
    }

    #[test]
    fn test_mirrored_step_reports_light_left() {
        let grid = step_target(80, 40, 30, 220, 15);
        let x = find_transition(&grid.view());
        assert_eq!(x, 30);
        assert!(!is_left_side_black(&grid.view(), x));
    }

    #[test]
    fn test_uniform_falls_back_to_centre() {
        for width in [3, 10, 41, 100] {
            let grid = uniform_grid(width, 7, 128);
            assert_eq!(find_transition(&grid.view()), width / 2);
        }
    }

    #[test]
    fn test_weak_step_below_threshold_falls_back() {
        let grid = step_target(60, 20, 15, 100, 125);
        assert_eq!(find_transition(&grid.view()), 30);

        // The same step clears a lowered threshold
        let config = SegmenterConfig {
            min_gradient: 20.0,
            ..Default::default()
        };
        assert_eq!(find_transition_with(&grid.view(), &config), 15);
    }

    #[test]
    fn test_first_maximum_wins_ties() {
        // Two identical steps; the left one is reported
        let grid = Array2::from_shape_fn((10, 60), |(_, x)| match x {
            0..=19 => 0u8,
            20..=39 => 100,
            _ => 200,
        });
        assert_eq!(find_transition(&grid.view()), 20);
    }

    #[test]
    fn test_degenerate_widths() {
        let narrow = uniform_grid(2, 5, 0);
        assert_eq!(find_transition(&narrow.view()), 1);

        let empty = Array2::<u8>::zeros((0, 0));
        assert_eq!(find_transition(&empty.view()), 0);
        assert!(column_means(&empty.view()).is_empty());
    }
}
