// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-frame pose rules.
//!
//! Turns one frame's landmarks into a gait observation:
//!
//! - the skeleton is accepted as a quadruped only when its spine is horizontal, i.e. on
//!   both body sides the shoulder-to-hip horizontal distance exceeds the vertical one;
//! - the gait is labelled `Injured` when the knees differ in height by more than the
//!   configured threshold;
//! - frames scored by a dog classifier must also pass the dog threshold.

use std::fmt;

use crate::config::GaitConfig;
use crate::gait::{GaitLabel, Sample};
use crate::landmarks::{BodyPart, KeypointLayout, Landmark, Pose};

/// Outcome of applying the pose rules to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    /// No pose was produced for the frame.
    NoPose,
    /// The dog classifier rejected the frame.
    NotDog,
    /// A required landmark is absent or below the confidence floor.
    MissingLandmarks,
    /// The skeleton is upright rather than a horizontal quadruped spine.
    NotHorizontal,
    /// A plausible dog with the given gait label.
    Gait(GaitLabel),
}

impl Assessment {
    /// Gait label if the frame counts as detected.
    #[must_use]
    pub const fn label(&self) -> Option<GaitLabel> {
        match self {
            Self::Gait(label) => Some(*label),
            _ => None,
        }
    }

    /// Build the accumulator sample for this frame.
    #[must_use]
    pub const fn sample(&self, timestamp: f64) -> Sample {
        Sample {
            timestamp,
            label: self.label(),
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPose => f.write_str("no pose"),
            Self::NotDog => f.write_str("no dog"),
            Self::MissingLandmarks => f.write_str("missing landmarks"),
            Self::NotHorizontal => f.write_str("spine not horizontal"),
            Self::Gait(label) => write!(f, "Status: {label}"),
        }
    }
}

/// Apply every rule to one frame.
///
/// # Arguments
///
/// * `pose` - Landmarks of the frame's subject, if the pose model found one.
/// * `dog_score` - Dog classifier probability, if the frame was scored.
/// * `config` - Thresholds and keypoint layout.
#[must_use]
pub fn assess(pose: Option<&Pose>, dog_score: Option<f32>, config: &GaitConfig) -> Assessment {
    if dog_score.is_some_and(|score| score <= config.dog_threshold) {
        return Assessment::NotDog;
    }
    let Some(pose) = pose else {
        return Assessment::NoPose;
    };
    let Some(body) = Body::locate(pose, config) else {
        return Assessment::MissingLandmarks;
    };
    if !body.spine_is_horizontal() {
        return Assessment::NotHorizontal;
    }
    Assessment::Gait(body.gait_label(config.knee_threshold))
}

/// Whether both shoulder-to-hip segments run more horizontally than vertically.
///
/// Returns `None` if a shoulder or hip landmark is missing.
#[must_use]
pub fn spine_is_horizontal(pose: &Pose, layout: KeypointLayout) -> Option<bool> {
    let side = |shoulder: BodyPart, hip: BodyPart| -> Option<bool> {
        let (sx, sy) = pose.pixel(layout.index(shoulder))?;
        let (hx, hy) = pose.pixel(layout.index(hip))?;
        Some((sx - hx).abs() > (sy - hy).abs())
    };
    let left = side(BodyPart::LeftShoulder, BodyPart::LeftHip)?;
    let right = side(BodyPart::RightShoulder, BodyPart::RightHip)?;
    Some(left && right)
}

/// Label a gait from the vertical knee distance in normalized coordinates.
#[must_use]
pub fn knee_gait_label(left_knee: &Landmark, right_knee: &Landmark, threshold: f32) -> GaitLabel {
    if (left_knee.y - right_knee.y).abs() > threshold {
        GaitLabel::Injured
    } else {
        GaitLabel::Healthy
    }
}

/// Required landmarks of one pose, resolved through the layout.
struct Body<'a> {
    pose: &'a Pose,
    layout: KeypointLayout,
    left_knee: Landmark,
    right_knee: Landmark,
}

impl<'a> Body<'a> {
    const REQUIRED: [BodyPart; 6] = [
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
    ];

    fn locate(pose: &'a Pose, config: &GaitConfig) -> Option<Self> {
        let layout = config.layout;
        let visible = |part: BodyPart| {
            pose.get(layout.index(part))
                .filter(|lm| lm.conf.is_none_or(|c| c >= config.min_keypoint_conf))
        };
        if !Self::REQUIRED.iter().all(|&part| visible(part).is_some()) {
            return None;
        }
        Some(Self {
            pose,
            layout,
            left_knee: visible(BodyPart::LeftKnee)?,
            right_knee: visible(BodyPart::RightKnee)?,
        })
    }

    fn spine_is_horizontal(&self) -> bool {
        spine_is_horizontal(self.pose, self.layout).unwrap_or(false)
    }

    fn gait_label(&self, threshold: f32) -> GaitLabel {
        knee_gait_label(&self.left_knee, &self.right_knee, threshold)
    }
}
