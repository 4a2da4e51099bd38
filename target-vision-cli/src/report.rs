//! Per-file assessment reports and output writing.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use target_vision::image_proc::assess_with;
use target_vision::ingest::{gray_from_grid, grid_from_image};
use target_vision::quality_gate::evaluate;
use target_vision::{
    ImageSize, PipelineConfig, PixelGrid, PreprocessedTarget, QualityAssessment, QualityVerdict,
};

/// File names written by [`write_preprocessed`].
pub const ENHANCED_FILE: &str = "enhanced.png";
pub const EDGES_FILE: &str = "edges.png";
pub const BACKGROUND_FILE: &str = "background.png";
pub const ASSESSMENT_FILE: &str = "assessment.json";

/// Assessment of one photo on disk.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub path: PathBuf,
    /// Size of the ingested grid (after any downscale)
    pub size: ImageSize,
    pub assessment: QualityAssessment,
    #[serde(flatten)]
    pub verdict: QualityVerdict,
}

impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let q = &self.assessment;
        write!(
            f,
            "{:<40} {:>9} sharp {:>8.1} contrast {:.3} black {:>5.1} white {:>5.1} noise {:>5.2} split {:.2}  ",
            self.path.display(),
            self.size.to_string(),
            q.sharpness,
            q.contrast,
            q.black_exposure,
            q.white_exposure,
            q.noise_level,
            q.transition_x
        )?;

        match &self.verdict {
            QualityVerdict::Accept => write!(f, "ACCEPT"),
            QualityVerdict::Reject(issues) => {
                write!(f, "REJECT")?;
                for issue in issues {
                    write!(f, "; {issue}")?;
                }
                Ok(())
            }
        }
    }
}

/// Decode a photo from disk and ingest it as a grayscale grid.
pub fn load_grid(path: &Path) -> Result<PixelGrid> {
    let image = image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    let grid = grid_from_image(&image);
    debug!(
        "Loaded {} as {} grid",
        path.display(),
        ImageSize::of_grid(&grid.view())
    );
    Ok(grid)
}

/// Decode, assess and gate one photo.
pub fn assess_file(path: &Path, config: &PipelineConfig) -> Result<ImageReport> {
    let grid = load_grid(path)?;
    Ok(assess_grid(path, &grid, config))
}

/// Assess and gate an already ingested photo.
pub fn assess_grid(path: &Path, grid: &PixelGrid, config: &PipelineConfig) -> ImageReport {
    let assessment = assess_with(&grid.view(), &config.segmenter);
    let verdict = evaluate(&assessment, &config.gate);

    ImageReport {
        path: path.to_path_buf(),
        size: ImageSize::of_grid(&grid.view()),
        assessment,
        verdict,
    }
}

/// Write the three preprocessed grids as PNGs plus the report as JSON.
pub fn write_preprocessed(
    out_dir: &Path,
    preprocessed: &PreprocessedTarget,
    report: &ImageReport,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    for (name, grid) in [
        (ENHANCED_FILE, &preprocessed.enhanced),
        (EDGES_FILE, &preprocessed.edges),
        (BACKGROUND_FILE, &preprocessed.background),
    ] {
        let path = out_dir.join(name);
        gray_from_grid(&grid.view())
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let path = out_dir.join(ASSESSMENT_FILE);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use target_vision::pipeline::preprocess;
    use target_vision::test_util::{synthetic_target, uniform_grid};

    fn save_grid(dir: &Path, name: &str, grid: &PixelGrid) -> PathBuf {
        let path = dir.join(name);
        gray_from_grid(&grid.view()).save(&path).unwrap();
        path
    }

    #[test]
    fn test_assess_file_accepts_synthetic_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_grid(dir.path(), "target.png", &synthetic_target(320, 240, 2.0, 42));

        let report = assess_file(&path, &PipelineConfig::with_radius(4)).unwrap();
        assert_eq!(report.size, ImageSize::from_width_height(320, 240));
        assert!(report.verdict.is_accepted(), "{}", report);
        assert!(report.to_string().ends_with("ACCEPT"));
    }

    #[test]
    fn test_assess_file_rejects_blank_photo() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_grid(dir.path(), "blank.png", &uniform_grid(200, 150, 128));

        let report = assess_file(&path, &PipelineConfig::with_radius(4)).unwrap();
        assert!(!report.verdict.is_accepted());
        assert!(report.to_string().contains("REJECT; image is blurry"));
    }

    #[test]
    fn test_undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"not a png").unwrap();

        assert!(load_grid(&path).is_err());
    }

    #[test]
    fn test_write_preprocessed_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let grid = synthetic_target(160, 120, 2.0, 3);
        let path = save_grid(dir.path(), "target.png", &grid);
        let config = PipelineConfig::with_radius(3);

        let report = assess_file(&path, &config).unwrap();
        let pre = preprocess(&grid.view(), &config);
        let out_dir = dir.path().join("out");
        write_preprocessed(&out_dir, &pre, &report).unwrap();

        for name in [ENHANCED_FILE, EDGES_FILE, BACKGROUND_FILE] {
            let written = image::open(out_dir.join(name)).unwrap().to_luma8();
            assert_eq!(written.dimensions(), (160, 120));
        }
        let enhanced = image::open(out_dir.join(ENHANCED_FILE)).unwrap().to_luma8();
        assert_eq!(enhanced, gray_from_grid(&pre.enhanced.view()));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out_dir.join(ASSESSMENT_FILE)).unwrap())
                .unwrap();
        assert!(json["assessment"]["sharpness"].is_number());
        assert!(json["verdict"].is_string());
    }
}
