// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Gait analysis summary.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::GaitConfig;
use crate::error::Result;
use crate::gait::{GaitTotals, Verdict};

/// Summary of one analyzed stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaitReport {
    /// Source path or identifier.
    pub source: String,
    /// Frames read.
    pub frames: usize,
    /// Frames in which a plausible dog was detected.
    pub detected_frames: usize,
    /// Seconds of healthy gait.
    pub healthy_secs: f64,
    /// Seconds of injured gait.
    pub injured_secs: f64,
    /// Seconds the dog was detected.
    pub detected_secs: f64,
    /// Injured share of labelled time, absent when nothing was labelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_fraction: Option<f64>,
    /// Final classification.
    pub verdict: Verdict,
}

impl GaitReport {
    /// Build a report from finalized totals.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        frames: usize,
        detected_frames: usize,
        totals: &GaitTotals,
        config: &GaitConfig,
    ) -> Self {
        Self {
            source: source.into(),
            frames,
            detected_frames,
            healthy_secs: totals.healthy,
            injured_secs: totals.injured,
            detected_secs: totals.detected,
            injury_fraction: totals.injury_fraction(),
            verdict: totals.classify(config),
        }
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()? + "\n")?;
        Ok(())
    }
}

impl fmt::Display for GaitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source: {}", self.source)?;
        writeln!(
            f,
            "Frames: {} ({} with a dog detected)",
            self.frames, self.detected_frames
        )?;
        writeln!(f, "Time dog detected: {:.2}s", self.detected_secs)?;
        writeln!(f, "Time healthy gait: {:.2}s", self.healthy_secs)?;
        writeln!(f, "Time injured gait: {:.2}s", self.injured_secs)?;
        if let Some(fraction) = self.injury_fraction {
            writeln!(f, "Injured share: {:.1}%", fraction * 100.0)?;
        }
        write!(f, "Verdict: {}", self.verdict)
    }
}
