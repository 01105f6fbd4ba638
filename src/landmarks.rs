// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose landmark storage and keypoint layouts.
//!
//! Upstream pose models emit one landmark per body keypoint. The index of each keypoint
//! depends on the model family, so lookups go through a [`KeypointLayout`].

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

use crate::error::{GaitError, Result};

/// Body keypoints used by the gait rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
}

/// Keypoint index layout of the upstream pose model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeypointLayout {
    /// `MediaPipe` / `BlazePose` 33-landmark topology.
    #[default]
    MediaPipe,
    /// COCO 17-keypoint topology, as produced by YOLO pose models.
    Coco,
}

impl KeypointLayout {
    /// Returns the string representation used in config files and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MediaPipe => "mediapipe",
            Self::Coco => "coco",
        }
    }

    /// Number of keypoints a complete pose carries in this layout.
    #[must_use]
    pub const fn num_keypoints(&self) -> usize {
        match self {
            Self::MediaPipe => 33,
            Self::Coco => 17,
        }
    }

    /// Landmark index of a body part.
    #[must_use]
    pub const fn index(&self, part: BodyPart) -> usize {
        match self {
            Self::MediaPipe => match part {
                BodyPart::LeftShoulder => 11,
                BodyPart::RightShoulder => 12,
                BodyPart::LeftHip => 23,
                BodyPart::RightHip => 24,
                BodyPart::LeftKnee => 25,
                BodyPart::RightKnee => 26,
            },
            Self::Coco => match part {
                BodyPart::LeftShoulder => 5,
                BodyPart::RightShoulder => 6,
                BodyPart::LeftHip => 11,
                BodyPart::RightHip => 12,
                BodyPart::LeftKnee => 13,
                BodyPart::RightKnee => 14,
            },
        }
    }
}

impl fmt::Display for KeypointLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KeypointLayout {
    type Err = LayoutParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mediapipe" | "blazepose" | "mp" => Ok(Self::MediaPipe),
            "coco" | "yolo" | "coco17" => Ok(Self::Coco),
            _ => Err(LayoutParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid layout string.
#[derive(Debug, Clone)]
pub struct LayoutParseError(String);

impl fmt::Display for LayoutParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid keypoint layout '{}', expected one of: mediapipe, coco",
            self.0
        )
    }
}

impl std::error::Error for LayoutParseError {}

/// A single landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Visibility or confidence score, when the model provides one.
    pub conf: Option<f32>,
}

/// Landmarks of one detected subject.
///
/// Stores normalized coordinates with shape `(K, 2)`, or `(K, 3)` when a confidence
/// column is included.
#[derive(Debug, Clone)]
pub struct Pose {
    /// Raw landmark data.
    pub data: Array2<f32>,
    /// Original image shape (height, width), if known.
    pub orig_shape: Option<(u32, u32)>,
}

impl Pose {
    /// Create a pose from a landmark array.
    ///
    /// # Errors
    ///
    /// Returns [`GaitError::Landmark`] if the array does not have 2 or 3 columns.
    pub fn new(data: Array2<f32>, orig_shape: Option<(u32, u32)>) -> Result<Self> {
        let cols = data.ncols();
        if cols != 2 && cols != 3 {
            return Err(GaitError::Landmark(format!(
                "expected 2 or 3 values per landmark, got {cols}"
            )));
        }
        Ok(Self { data, orig_shape })
    }

    /// Create a pose from `[x, y]` or `[x, y, conf]` rows.
    ///
    /// # Errors
    ///
    /// Returns [`GaitError::Landmark`] if the rows have differing or unsupported lengths.
    pub fn from_rows(rows: &[Vec<f32>], orig_shape: Option<(u32, u32)>) -> Result<Self> {
        let cols = rows.first().map_or(2, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(GaitError::Landmark(format!(
                "landmark {bad} has {} values, expected {cols}",
                rows[bad].len()
            )));
        }
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), cols), flat)
            .map_err(|e| GaitError::Landmark(e.to_string()))?;
        Self::new(data, orig_shape)
    }

    /// Number of landmarks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Check if the pose holds no landmarks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Whether a confidence column is present.
    #[must_use]
    pub fn has_conf(&self) -> bool {
        self.data.ncols() == 3
    }

    /// Whether the pose carries every keypoint of `layout`.
    ///
    /// A shorter pose usually means the stream was produced for a different layout.
    #[must_use]
    pub fn fits(&self, layout: KeypointLayout) -> bool {
        self.len() >= layout.num_keypoints()
    }

    /// Landmark at `idx`, if present.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Landmark> {
        if idx >= self.len() {
            return None;
        }
        let row = self.data.slice(s![idx, ..]);
        Some(Landmark {
            x: row[0],
            y: row[1],
            conf: self.has_conf().then(|| row[2]),
        })
    }

    /// Landmark at `idx` in pixel coordinates.
    ///
    /// Falls back to normalized coordinates when the image shape is unknown.
    #[must_use]
    pub fn pixel(&self, idx: usize) -> Option<(f32, f32)> {
        let lm = self.get(idx)?;
        #[allow(clippy::cast_precision_loss)]
        let (h, w) = self
            .orig_shape
            .map_or((1.0, 1.0), |(h, w)| (h as f32, w as f32));
        Some((lm.x * w, lm.y * h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_str() {
        assert_eq!(
            "mediapipe".parse::<KeypointLayout>().unwrap(),
            KeypointLayout::MediaPipe
        );
        assert_eq!(
            "BlazePose".parse::<KeypointLayout>().unwrap(),
            KeypointLayout::MediaPipe
        );
        assert_eq!("coco".parse::<KeypointLayout>().unwrap(), KeypointLayout::Coco);
        assert_eq!("yolo".parse::<KeypointLayout>().unwrap(), KeypointLayout::Coco);
        assert!("openpose".parse::<KeypointLayout>().is_err());
    }

    #[test]
    fn test_layout_indices() {
        let mp = KeypointLayout::MediaPipe;
        assert_eq!(mp.index(BodyPart::LeftKnee), 25);
        assert_eq!(mp.index(BodyPart::RightKnee), 26);
        assert_eq!(mp.index(BodyPart::LeftHip), 23);

        let coco = KeypointLayout::Coco;
        assert_eq!(coco.index(BodyPart::LeftShoulder), 5);
        assert_eq!(coco.index(BodyPart::RightKnee), 14);
        assert!(coco.index(BodyPart::RightKnee) < coco.num_keypoints());
        assert_eq!(KeypointLayout::Coco.to_string(), "coco");
    }

    #[test]
    fn test_pose_from_rows() {
        let pose = Pose::from_rows(&[vec![0.1, 0.2, 0.9], vec![0.3, 0.4, 0.5]], None).unwrap();
        assert_eq!(pose.len(), 2);
        assert!(pose.has_conf());

        let lm = pose.get(1).unwrap();
        assert!((lm.x - 0.3).abs() < f32::EPSILON);
        assert_eq!(lm.conf, Some(0.5));
        assert!(pose.get(2).is_none());
    }

    #[test]
    fn test_pose_fits_layout() {
        let coco = Pose::from_rows(&vec![vec![0.5, 0.5]; 17], None).unwrap();
        assert!(coco.fits(KeypointLayout::Coco));
        assert!(!coco.fits(KeypointLayout::MediaPipe));

        let mediapipe = Pose::from_rows(&vec![vec![0.5, 0.5, 0.9]; 33], None).unwrap();
        assert!(mediapipe.fits(KeypointLayout::MediaPipe));
        assert!(mediapipe.fits(KeypointLayout::Coco));
    }

    #[test]
    fn test_pose_rejects_ragged_rows() {
        let err = Pose::from_rows(&[vec![0.1, 0.2], vec![0.3]], None).unwrap_err();
        assert!(matches!(err, GaitError::Landmark(_)));

        let err = Pose::from_rows(&[vec![0.1, 0.2, 0.3, 0.4]], None).unwrap_err();
        assert!(matches!(err, GaitError::Landmark(_)));
    }

    #[test]
    fn test_pose_pixel_coordinates() {
        let pose = Pose::from_rows(&[vec![0.5, 0.25]], Some((480, 640))).unwrap();
        let (x, y) = pose.pixel(0).unwrap();
        assert!((x - 320.0).abs() < 1e-3);
        assert!((y - 120.0).abs() < 1e-3);

        let pose = Pose::from_rows(&[vec![0.5, 0.25]], None).unwrap();
        assert_eq!(pose.pixel(0), Some((0.5, 0.25)));
    }
}
