//! End-to-end flow for one target photo.
//!
//! grid -> segmentation + metrics -> quality gate -> (accepted only) CLAHE ->
//! Sobel edges and morphological background, both computed from the
//! equalized grid. Every stage is a pure function of its input; the caller
//! owns the grid and may run independent photos on separate threads.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::image_proc::{
    assess_with, equalize, morphological_opening, sobel_edges_scaled, ClaheConfig,
    QualityAssessment, SegmenterConfig, SOBEL_MAGNITUDE_SCALE,
};
use crate::quality_gate::{evaluate, QualityThresholds, QualityVerdict};
use crate::PixelGrid;

/// Errors loading a pipeline configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

fn default_edge_scale() -> f64 {
    SOBEL_MAGNITUDE_SCALE
}

/// Complete tuning for [`run`] and [`preprocess`].
///
/// Only `opening_radius` has no sensible default; it depends on the hole size
/// in pixels and must be supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub segmenter: SegmenterConfig,
    #[serde(default)]
    pub clahe: ClaheConfig,
    /// Divisor for Sobel magnitudes
    #[serde(default = "default_edge_scale")]
    pub edge_scale: f64,
    /// Disk radius for background estimation, in pixels
    pub opening_radius: usize,
    #[serde(default)]
    pub gate: QualityThresholds,
}

impl PipelineConfig {
    /// Default tuning with the given opening radius.
    pub fn with_radius(opening_radius: usize) -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            clahe: ClaheConfig::default(),
            edge_scale: SOBEL_MAGNITUDE_SCALE,
            opening_radius,
            gate: QualityThresholds::default(),
        }
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Grids handed to the hole detector.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedTarget {
    /// CLAHE-equalized photo
    pub enhanced: PixelGrid,
    /// Sobel magnitude of the equalized photo
    pub edges: PixelGrid,
    /// Morphological opening of the equalized photo (zeroed outer band)
    pub background: PixelGrid,
}

/// Result of running the whole flow on one photo.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub assessment: QualityAssessment,
    pub verdict: QualityVerdict,
    /// Present only when the verdict accepted the photo
    pub preprocessed: Option<PreprocessedTarget>,
}

/// Equalize the grid and derive edge and background maps from it.
pub fn preprocess(grid: &ArrayView2<u8>, config: &PipelineConfig) -> PreprocessedTarget {
    let enhanced = equalize(grid, &config.clahe);
    let edges = sobel_edges_scaled(&enhanced.view(), config.edge_scale);
    let background = morphological_opening(&enhanced.view(), config.opening_radius);
    debug!(
        "Preprocessed {}x{} grid (opening radius {})",
        grid.ncols(),
        grid.nrows(),
        config.opening_radius
    );

    PreprocessedTarget {
        enhanced,
        edges,
        background,
    }
}

/// Assess, gate and, when accepted, preprocess one photo.
pub fn run(grid: &ArrayView2<u8>, config: &PipelineConfig) -> PipelineOutcome {
    let assessment = assess_with(grid, &config.segmenter);
    let verdict = evaluate(&assessment, &config.gate);

    let preprocessed = if verdict.is_accepted() {
        Some(preprocess(grid, config))
    } else {
        info!("Photo rejected: {} issue(s)", verdict.issues().len());
        None
    };

    PipelineOutcome {
        assessment,
        verdict,
        preprocessed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{synthetic_target, uniform_grid};

    #[test]
    fn test_config_requires_radius() {
        assert!(PipelineConfig::from_json("{}").is_err());

        let config = PipelineConfig::from_json(r#"{"opening_radius": 6}"#).unwrap();
        assert_eq!(config, PipelineConfig::with_radius(6));
    }

    #[test]
    fn test_config_partial_override() {
        let config = PipelineConfig::from_json(
            r#"{"opening_radius": 4, "clahe": {"clip_limit": 3.5}, "edge_scale": 2.0}"#,
        )
        .unwrap();
        assert_eq!(config.clahe.clip_limit, 3.5);
        assert_eq!(config.clahe.tile_size, 32);
        assert_eq!(config.edge_scale, 2.0);
        assert_eq!(config.segmenter, SegmenterConfig::default());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");

        let mut config = PipelineConfig::with_radius(9);
        config.gate.min_contrast = 0.5;
        config.save(&path).unwrap();

        assert_eq!(PipelineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let err = PipelineConfig::load(Path::new("/nonexistent/pipeline.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_rejected_photo_is_not_preprocessed() {
        let grid = uniform_grid(120, 90, 128);
        let outcome = run(&grid.view(), &PipelineConfig::with_radius(3));
        assert!(!outcome.verdict.is_accepted());
        assert!(outcome.preprocessed.is_none());
    }

    #[test]
    fn test_accepted_photo_is_preprocessed() {
        let grid = synthetic_target(240, 180, 3.0, 11);
        let outcome = run(&grid.view(), &PipelineConfig::with_radius(4));
        assert!(outcome.verdict.is_accepted(), "{:?}", outcome.verdict);

        let pre = outcome.preprocessed.unwrap();
        assert_eq!(pre.enhanced.dim(), grid.dim());
        assert_eq!(pre.edges.dim(), grid.dim());
        assert_eq!(pre.background.dim(), grid.dim());
        assert!(pre.background.row(0).iter().all(|&v| v == 0));
    }
}
