//! Image processing module for paper target photos
//!
//! This module provides the quality metrics and preprocessing transforms that
//! run on a grayscale target photo before any hole detection: dark/light
//! segmentation, sharpness/contrast/noise metrics, CLAHE, Sobel edges and
//! morphological background estimation.

pub mod clahe;
pub mod morphology;
pub mod noise;
pub mod quality;
pub mod segment;
pub mod sobel;
pub mod stats;

// Re-export key functionality for easier access
pub use clahe::{equalize, equalize_in_place, ClaheConfig};
pub use morphology::{dilate_disk, erode_disk, morphological_opening};
pub use noise::estimate_noise_mad;
pub use quality::{assess, assess_with, laplacian_variance, percentile_contrast, QualityAssessment};
pub use segment::{find_transition, find_transition_with, is_left_side_black, SegmenterConfig};
pub use sobel::{sobel_edges, sobel_edges_scaled, SOBEL_MAGNITUDE_SCALE};
pub use stats::{region_mean, region_variance};
