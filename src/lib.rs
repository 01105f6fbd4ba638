// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # Dog Gait Analysis Library
//!
//! Times healthy and injured gait of a dog from per-frame pose landmarks. An upstream
//! pose model (`MediaPipe`, YOLO pose, ...) runs on each video frame; this crate takes its
//! landmarks, decides whether the skeleton is a plausible quadruped, labels the gait from
//! the knee heights, and accumulates how long the dog walked in each state.
//!
//! ## Features
//!
//! - **Interval timing** - Durations are summed between state transitions, not per frame
//! - **Pose rules** - Horizontal spine check and knee height gait label
//! - **Keypoint layouts** - `MediaPipe` 33-point and COCO 17-point topologies
//! - **Dog gate** - Optional per-frame dog classifier score
//! - **Configurable** - Every threshold is a named, overridable setting (builder or TOML)
//!
//! ## Quick Start (Library)
//!
//! ```rust
//! use dog_gait::{GaitAccumulator, GaitConfig, GaitLabel, Sample, Verdict};
//!
//! let config = GaitConfig::default();
//! let mut acc = GaitAccumulator::new();
//!
//! // 8 seconds of walking at 10 fps, limping for the last second
//! for frame in 0..80 {
//!     let label = if frame < 70 { GaitLabel::Healthy } else { GaitLabel::Injured };
//!     acc.observe(Sample::detected(f64::from(frame) / 10.0, label));
//! }
//! let totals = acc.finish();
//!
//! assert_eq!(totals.classify(&config), Verdict::Healthy);
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Analyze a landmark stream (JSON lines, one record per frame)
//! dog-gait analyze --source walk.jsonl
//!
//! # 60 fps video, YOLO pose keypoints, JSON summary
//! dog-gait analyze -s walk.jsonl --fps 60 --layout coco --json
//!
//! # Read from a pose extractor on stdin and save the summary
//! pose-extractor video.mov | dog-gait analyze -s - --save report.json
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`gait`] | [`GaitAccumulator`], [`Sample`], [`Verdict`] |
//! | [`posture`] | Spine and knee rules producing a per-frame [`Assessment`] |
//! | [`landmarks`] | [`Pose`] storage and [`KeypointLayout`] indices |
//! | [`source`] | JSON-lines [`FrameReader`] with frame timing |
//! | [`report`] | [`GaitReport`] summary |
//! | [`config`] | [`GaitConfig`] thresholds |
//! | [`error`] | Error types ([`GaitError`], [`Result`]) |

// Modules
pub mod cli;
pub mod config;
pub mod error;
pub mod gait;
pub mod landmarks;
pub mod posture;
pub mod report;
pub mod source;

// Re-export main types for convenience
pub use config::GaitConfig;
pub use error::{GaitError, Result};
pub use gait::{GaitAccumulator, GaitLabel, GaitTotals, Sample, TrackingState, Verdict};
pub use landmarks::{BodyPart, KeypointLayout, Landmark, Pose};
pub use posture::{Assessment, assess};
pub use report::GaitReport;
pub use source::{FrameMeta, FrameReader, FrameRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "dog-gait");
    }
}
