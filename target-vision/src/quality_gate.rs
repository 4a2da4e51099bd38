//! Accept/reject decision on top of a [`QualityAssessment`].
//!
//! The metrics themselves never fail; this gate is where low scores turn into
//! a re-capture request. Each failed check is reported as a [`QualityIssue`]
//! carrying the observed value, so the capture UI can tell the shooter what
//! to fix (hold steady, add light, frame the whole target, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::image_proc::QualityAssessment;

/// Acceptance thresholds for a target photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Minimum Laplacian variance
    pub min_sharpness: f64,
    /// Minimum 5th-95th percentile contrast
    pub min_contrast: f64,
    /// Lowest acceptable mean of the light half
    pub min_white_exposure: f64,
    /// Highest acceptable mean of the light half
    pub max_white_exposure: f64,
    /// Highest acceptable mean of the dark half
    pub max_black_exposure: f64,
    /// Minimum intensity variance inside the dark half
    pub min_black_visibility: f64,
    /// Maximum MAD noise estimate
    pub max_noise_level: f64,
    /// Accepted range of the normalised split column
    pub transition_range: (f64, f64),
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_sharpness: 50.0,
            min_contrast: 0.30,
            min_white_exposure: 120.0,
            max_white_exposure: 250.0,
            max_black_exposure: 110.0,
            min_black_visibility: 2.0,
            max_noise_level: 12.0,
            transition_range: (0.2, 0.8),
        }
    }
}

/// A single failed check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", content = "value", rename_all = "snake_case")]
pub enum QualityIssue {
    Blurry(f64),
    LowContrast(f64),
    Underexposed(f64),
    Overexposed(f64),
    BlackHalfTooBright(f64),
    BlackHalfFeatureless(f64),
    Noisy(f64),
    OffCenter(f64),
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QualityIssue::Blurry(v) => write!(f, "image is blurry (sharpness {v:.1})"),
            QualityIssue::LowContrast(v) => write!(f, "contrast too low ({v:.3})"),
            QualityIssue::Underexposed(v) => write!(f, "light half underexposed (mean {v:.1})"),
            QualityIssue::Overexposed(v) => write!(f, "light half overexposed (mean {v:.1})"),
            QualityIssue::BlackHalfTooBright(v) => {
                write!(f, "dark half too bright (mean {v:.1})")
            }
            QualityIssue::BlackHalfFeatureless(v) => {
                write!(f, "no detail visible in dark half (variance {v:.2})")
            }
            QualityIssue::Noisy(v) => write!(f, "image too noisy (noise {v:.2})"),
            QualityIssue::OffCenter(v) => {
                write!(f, "target not centred (split at {:.0}% of width)", v * 100.0)
            }
        }
    }
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "issues", rename_all = "snake_case")]
pub enum QualityVerdict {
    Accept,
    Reject(Vec<QualityIssue>),
}

impl QualityVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, QualityVerdict::Accept)
    }

    /// Failed checks, empty for an accepted photo.
    pub fn issues(&self) -> &[QualityIssue] {
        match self {
            QualityVerdict::Accept => &[],
            QualityVerdict::Reject(issues) => issues,
        }
    }
}

/// Check an assessment against thresholds.
///
/// Issues are reported in a fixed order: sharpness, contrast, light half
/// exposure, dark half exposure, dark half visibility, noise, split position.
pub fn evaluate(assessment: &QualityAssessment, thresholds: &QualityThresholds) -> QualityVerdict {
    let q = assessment;
    let t = thresholds;
    let mut issues = Vec::new();

    if q.sharpness < t.min_sharpness {
        issues.push(QualityIssue::Blurry(q.sharpness));
    }
    if q.contrast < t.min_contrast {
        issues.push(QualityIssue::LowContrast(q.contrast));
    }
    if q.white_exposure < t.min_white_exposure {
        issues.push(QualityIssue::Underexposed(q.white_exposure));
    } else if q.white_exposure > t.max_white_exposure {
        issues.push(QualityIssue::Overexposed(q.white_exposure));
    }
    if q.black_exposure > t.max_black_exposure {
        issues.push(QualityIssue::BlackHalfTooBright(q.black_exposure));
    }
    if q.black_visibility < t.min_black_visibility {
        issues.push(QualityIssue::BlackHalfFeatureless(q.black_visibility));
    }
    if q.noise_level > t.max_noise_level {
        issues.push(QualityIssue::Noisy(q.noise_level));
    }
    let (lo, hi) = t.transition_range;
    if q.transition_x < lo || q.transition_x > hi {
        issues.push(QualityIssue::OffCenter(q.transition_x));
    }

    if issues.is_empty() {
        QualityVerdict::Accept
    } else {
        QualityVerdict::Reject(issues)
    }
}
