// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Gait analysis configuration.
//!
//! This module defines the [`GaitConfig`] struct, which holds the heuristics used to turn
//! per-frame pose landmarks into gait samples and the thresholds used to reduce the
//! accumulated durations to a [`Verdict`](crate::Verdict).
//!
//! The thresholds are arbitrary, tunable heuristics. They carry no calibration evidence.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GaitError, Result};
use crate::landmarks::KeypointLayout;

/// Default knee height difference (normalized coordinates) above which a frame is `Injured`.
pub const DEFAULT_KNEE_THRESHOLD: f32 = 0.1;

/// Default injured share of labelled time above which the verdict is `Injured`.
pub const DEFAULT_INJURY_FRACTION: f64 = 0.2;

/// Default minimum detected time, in seconds, for a conclusive verdict.
pub const DEFAULT_MIN_DETECTED_SECS: f64 = 5.0;

/// Default dog classifier probability above which a frame shows a dog.
pub const DEFAULT_DOG_THRESHOLD: f32 = 0.5;

/// Default frame rate used to derive timestamps from frame indices.
pub const DEFAULT_FPS: f64 = 30.0;

/// Configuration for gait analysis.
///
/// Uses a builder pattern for convenient construction and can be read from a TOML file,
/// where every key is optional and falls back to its default.
///
/// # Example
///
/// ```rust
/// use dog_gait::GaitConfig;
///
/// let config = GaitConfig::new()
///     .with_knee_threshold(0.08)
///     .with_injury_fraction(0.25)
///     .with_fps(60.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitConfig {
    /// Knee height difference (normalized, 0.0 to 1.0) above which a frame is labelled `Injured`.
    pub knee_threshold: f32,
    /// Injured share of labelled time (0.0 to 1.0) above which the verdict is `Injured`.
    pub injury_fraction: f64,
    /// Minimum detected time in seconds before any verdict other than `Inconclusive`.
    pub min_detected_secs: f64,
    /// Dog classifier probability a frame must exceed to count as detected.
    /// Only applied to frames that carry a score.
    pub dog_threshold: f32,
    /// Landmarks with a confidence below this value are treated as missing.
    pub min_keypoint_conf: f32,
    /// Frame rate used when frames carry no explicit timestamp.
    pub fps: f64,
    /// Landmark index layout produced by the upstream pose model.
    pub layout: KeypointLayout,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            knee_threshold: DEFAULT_KNEE_THRESHOLD,
            injury_fraction: DEFAULT_INJURY_FRACTION,
            min_detected_secs: DEFAULT_MIN_DETECTED_SECS,
            dog_threshold: DEFAULT_DOG_THRESHOLD,
            min_keypoint_conf: 0.0,
            fps: DEFAULT_FPS,
            layout: KeypointLayout::default(),
        }
    }
}

impl GaitConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML,
    /// or holds out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is in range.
    ///
    /// # Errors
    ///
    /// Returns [`GaitError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.knee_threshold) {
            return Err(GaitError::Config(format!(
                "knee_threshold must be in [0, 1], got {}",
                self.knee_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.injury_fraction) {
            return Err(GaitError::Config(format!(
                "injury_fraction must be in [0, 1], got {}",
                self.injury_fraction
            )));
        }
        if !self.min_detected_secs.is_finite() || self.min_detected_secs < 0.0 {
            return Err(GaitError::Config(format!(
                "min_detected_secs must be a non-negative number, got {}",
                self.min_detected_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.dog_threshold) {
            return Err(GaitError::Config(format!(
                "dog_threshold must be in [0, 1], got {}",
                self.dog_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_keypoint_conf) {
            return Err(GaitError::Config(format!(
                "min_keypoint_conf must be in [0, 1], got {}",
                self.min_keypoint_conf
            )));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(GaitError::Config(format!(
                "fps must be a positive number, got {}",
                self.fps
            )));
        }
        Ok(())
    }

    /// Set the knee height difference threshold.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Normalized vertical knee distance (0.0 to 1.0).
    #[must_use]
    pub const fn with_knee_threshold(mut self, threshold: f32) -> Self {
        self.knee_threshold = threshold;
        self
    }

    /// Set the injured share of labelled time above which the verdict is `Injured`.
    #[must_use]
    pub const fn with_injury_fraction(mut self, fraction: f64) -> Self {
        self.injury_fraction = fraction;
        self
    }

    /// Set the minimum detected time, in seconds, for a conclusive verdict.
    #[must_use]
    pub const fn with_min_detected_secs(mut self, secs: f64) -> Self {
        self.min_detected_secs = secs;
        self
    }

    /// Set the dog classifier threshold.
    #[must_use]
    pub const fn with_dog_threshold(mut self, threshold: f32) -> Self {
        self.dog_threshold = threshold;
        self
    }

    /// Set the minimum landmark confidence.
    #[must_use]
    pub const fn with_min_keypoint_conf(mut self, conf: f32) -> Self {
        self.min_keypoint_conf = conf;
        self
    }

    /// Set the frame rate used to derive timestamps.
    #[must_use]
    pub const fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Set the landmark index layout.
    #[must_use]
    pub const fn with_layout(mut self, layout: KeypointLayout) -> Self {
        self.layout = layout;
        self
    }
}
