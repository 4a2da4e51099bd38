//! Population statistics over 8-bit pixel regions.
//!
//! Regions are column slices of a grid (`grid.slice(s![.., a..b])`), so every
//! helper takes an `ArrayView2<u8>` and treats it as a flat sample set. Empty
//! regions report 0 rather than NaN.

use ndarray::ArrayView2;

/// Mean intensity of a region, 0.0 when it holds no pixels.
pub fn region_mean(region: &ArrayView2<u8>) -> f64 {
    let count = region.len();
    if count == 0 {
        return 0.0;
    }

    let sum: u64 = region.iter().map(|&v| v as u64).sum();
    sum as f64 / count as f64
}

/// Population variance of a region (denominator `n`), 0.0 when empty.
pub fn region_variance(region: &ArrayView2<u8>) -> f64 {
    let count = region.len();
    if count == 0 {
        return 0.0;
    }

    let mean = region_mean(region);
    region
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / count as f64
}

/// 256-bin intensity histogram of a region.
pub fn histogram(region: &ArrayView2<u8>) -> [u32; 256] {
    let mut bins = [0u32; 256];
    for &v in region.iter() {
        bins[v as usize] += 1;
    }
    bins
}

/// The `rank`-th smallest intensity (0-based) described by a histogram.
///
/// Equivalent to sorting the pixels ascending and indexing `rank`, without
/// materialising the sorted copy. Ranks past the end clamp to the largest
/// populated bin.
pub fn intensity_at_rank(bins: &[u32; 256], rank: usize) -> u8 {
    let mut seen = 0usize;
    let mut last = 0u8;
    for (value, &count) in bins.iter().enumerate() {
        if count == 0 {
            continue;
        }
        last = value as u8;
        seen += count as usize;
        if rank < seen {
            return last;
        }
    }
    last
}

/// Median of an unsorted sample set, taken as the upper middle element.
///
/// Sorts `samples` in place. Returns 0.0 for an empty slice.
pub fn upper_median(samples: &mut [f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.sort_by(|a, b| a.total_cmp(b));
    samples[samples.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, s, Array2};

    #[test]
    fn test_mean_and_variance_are_population() {
        let region = array![[2u8, 4], [4, 4], [5, 5], [7, 9]];
        assert_relative_eq!(region_mean(&region.view()), 5.0);
        // Classic textbook set: population std dev 2, sample std dev would differ
        assert_relative_eq!(region_variance(&region.view()), 4.0);
    }

    #[test]
    fn test_empty_region_is_zero() {
        let grid = Array2::<u8>::from_elem((4, 4), 9);
        let empty = grid.slice(s![.., 0..0]);
        assert_eq!(region_mean(&empty), 0.0);
        assert_eq!(region_variance(&empty), 0.0);
    }

    #[test]
    fn test_rank_matches_sorted_index() {
        let grid = array![[9u8, 3, 3], [250, 0, 17]];
        let bins = histogram(&grid.view());
        let mut sorted: Vec<u8> = grid.iter().copied().collect();
        sorted.sort_unstable();

        for (rank, &expected) in sorted.iter().enumerate() {
            assert_eq!(intensity_at_rank(&bins, rank), expected);
        }
        assert_eq!(intensity_at_rank(&bins, 100), 250);
    }

    #[test]
    fn test_upper_median() {
        assert_eq!(upper_median(&mut []), 0.0);
        assert_eq!(upper_median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(upper_median(&mut [4.0, 1.0, 3.0, 2.0]), 3.0);
    }
}
