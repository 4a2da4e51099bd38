//! Config resolution and exit decisions for the `target_assess` subcommands.

use anyhow::{bail, Result};
use std::path::Path;

use target_vision::{PipelineConfig, QualityVerdict};

use crate::report::ImageReport;

/// Radius used by `assess`, which never runs the opening.
pub const ASSESS_ONLY_RADIUS: usize = 1;

/// Command line values that take precedence over a config file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    pub radius: Option<usize>,
    pub clip_limit: Option<f64>,
    pub tile_size: Option<usize>,
    pub edge_scale: Option<f64>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(radius) = self.radius {
            config.opening_radius = radius;
        }
        if let Some(clip_limit) = self.clip_limit {
            config.clahe.clip_limit = clip_limit;
        }
        if let Some(tile_size) = self.tile_size {
            config.clahe.tile_size = tile_size;
        }
        if let Some(edge_scale) = self.edge_scale {
            config.edge_scale = edge_scale;
        }
    }
}

/// Config for `assess`: the file if given, default tuning otherwise.
pub fn assess_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => Ok(PipelineConfig::load(path)?),
        None => Ok(PipelineConfig::with_radius(ASSESS_ONLY_RADIUS)),
    }
}

/// Config for `preprocess`.
///
/// The opening radius comes from `--radius` or the config file; flags win
/// over file values.
pub fn preprocess_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<PipelineConfig> {
    let mut config = match (path, overrides.radius) {
        (Some(path), _) => PipelineConfig::load(path)?,
        (None, Some(radius)) => PipelineConfig::with_radius(radius),
        (None, None) => bail!("--radius is required unless --config provides opening_radius"),
    };
    overrides.apply(&mut config);
    Ok(config)
}

/// True when every photo decoded and passed the gate.
pub fn all_accepted<'a, I>(results: I) -> bool
where
    I: IntoIterator<Item = &'a Result<ImageReport>>,
{
    results
        .into_iter()
        .all(|result| matches!(result, Ok(report) if report.verdict.is_accepted()))
}

/// Whether `preprocess` may write outputs for a photo with this verdict.
pub fn should_preprocess(verdict: &QualityVerdict, force: bool) -> bool {
    verdict.is_accepted() || force
}
