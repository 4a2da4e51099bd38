//! Quality assessment and preprocessing for photographed paper shooting targets.
//!
//! The crate runs before any hole counting: it decides whether a photo of a
//! light/dark target is good enough to score and, if so, prepares the grids
//! the hole detector consumes.
//!
//! # Modules
//!
//! - [`ingest`]: decoded photo to grayscale [`PixelGrid`], longer edge capped at 1200 px
//! - [`image_proc`]: segmentation, quality metrics, CLAHE, Sobel, morphology
//! - [`quality_gate`]: accept/reject thresholds over the metrics
//! - [`pipeline`]: the full assess → gate → preprocess flow and its config
//! - [`test_util`]: deterministic synthetic targets
//!
//! # Usage
//!
//! ```
//! use target_vision::pipeline::{run, PipelineConfig};
//! use target_vision::test_util::synthetic_target;
//!
//! let grid = synthetic_target(320, 240, 2.0, 42);
//! let outcome = run(&grid.view(), &PipelineConfig::with_radius(5));
//! println!("{:?}", outcome.assessment);
//! ```
//!
//! No function in the processing path returns an error. Tiny or featureless
//! grids produce zero or neutral metrics, which the quality gate rejects.

pub mod image_proc;
pub mod image_size;
pub mod ingest;
pub mod pipeline;
pub mod quality_gate;
pub mod test_util;

/// Row-major grayscale image, indexed `[[y, x]]`, shape `(height, width)`.
pub type PixelGrid = ndarray::Array2<u8>;

pub use image_proc::QualityAssessment;
pub use image_size::ImageSize;
pub use pipeline::{PipelineConfig, PipelineOutcome, PreprocessedTarget};
pub use quality_gate::{QualityThresholds, QualityVerdict};
