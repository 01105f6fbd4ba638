// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-frame landmark input.
//!
//! Frames arrive as JSON lines, one record per decoded video frame, as produced by an
//! upstream pose model:
//!
//! ```text
//! {"frame": 0, "landmarks": [[0.31, 0.40, 0.98], ...], "orig_shape": [1080, 1920]}
//! {"frame": 1, "timestamp": 0.033, "landmarks": null, "dog_score": 0.12}
//! ```
//!
//! Every key is optional. A frame without `landmarks` had no pose. A frame without a
//! `frame` index follows the previous frame. Frames without a `timestamp` are timed from
//! their index and the configured frame rate.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GaitError, Result};
use crate::landmarks::Pose;

/// One frame of upstream pose output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameRecord {
    /// Frame index in the video.
    pub frame: Option<usize>,
    /// Explicit frame time in seconds.
    pub timestamp: Option<f64>,
    /// Normalized `[x, y]` or `[x, y, conf]` landmarks of the subject.
    pub landmarks: Option<Vec<Vec<f32>>>,
    /// Original image shape (height, width).
    pub orig_shape: Option<(u32, u32)>,
    /// Probability that the frame shows a dog.
    pub dog_score: Option<f32>,
}

impl FrameRecord {
    /// Build the pose for this frame, if it has landmarks.
    ///
    /// # Errors
    ///
    /// Returns [`GaitError::Landmark`] if the landmark rows are malformed.
    pub fn pose(&self) -> Result<Option<Pose>> {
        self.landmarks
            .as_deref()
            .map(|rows| Pose::from_rows(rows, self.orig_shape))
            .transpose()
    }
}

/// Metadata about a source frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMeta {
    /// Frame index.
    pub frame_idx: usize,
    /// Frame time in seconds.
    pub timestamp: f64,
    /// Input line number (1-based).
    pub line: usize,
}

/// Iterator over frame records read from JSON lines.
///
/// Blank lines are skipped. Timestamps must not decrease from one frame to the next.
pub struct FrameReader<R> {
    reader: R,
    fps: f64,
    line: usize,
    frames: usize,
    next_idx: usize,
    last_timestamp: Option<f64>,
    buf: String,
}

impl FrameReader<Box<dyn BufRead>> {
    /// Open a JSON-lines file, or standard input when `path` is `-`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or `fps` is not positive.
    pub fn open(path: impl AsRef<Path>, fps: f64) -> Result<Self> {
        let path = path.as_ref();
        let reader: Box<dyn BufRead> = if path == Path::new("-") {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let file = File::open(path).map_err(|e| {
                GaitError::Io(io::Error::new(
                    e.kind(),
                    format!("{}: {e}", path.display()),
                ))
            })?;
            Box::new(BufReader::new(file))
        };
        Self::new(reader, fps)
    }
}

impl<R: BufRead> FrameReader<R> {
    /// Create a reader over any buffered input.
    ///
    /// # Errors
    ///
    /// Returns [`GaitError::Config`] if `fps` is not a positive number.
    pub fn new(reader: R, fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(GaitError::Config(format!(
                "fps must be a positive number, got {fps}"
            )));
        }
        Ok(Self {
            reader,
            fps,
            line: 0,
            frames: 0,
            next_idx: 0,
            last_timestamp: None,
            buf: String::new(),
        })
    }

    /// Number of frames yielded so far.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }

    fn parse(&mut self) -> Result<(FrameRecord, FrameMeta)> {
        let record: FrameRecord =
            serde_json::from_str(self.buf.trim()).map_err(|e| GaitError::Parse {
                line: self.line,
                msg: e.to_string(),
            })?;

        let frame_idx = record.frame.unwrap_or(self.next_idx);
        #[allow(clippy::cast_precision_loss)]
        let timestamp = record
            .timestamp
            .unwrap_or_else(|| frame_idx as f64 / self.fps);

        if !timestamp.is_finite() || timestamp < 0.0 {
            return Err(GaitError::Timestamp(format!(
                "line {}: invalid timestamp {timestamp}",
                self.line
            )));
        }
        if let Some(prev) = self.last_timestamp
            && timestamp < prev
        {
            return Err(GaitError::Timestamp(format!(
                "line {}: timestamp {timestamp:.3}s is earlier than previous frame at {prev:.3}s",
                self.line
            )));
        }

        self.last_timestamp = Some(timestamp);
        self.frames += 1;
        self.next_idx = frame_idx + 1;
        let meta = FrameMeta {
            frame_idx,
            timestamp,
            line: self.line,
        };
        Ok((record, meta))
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<(FrameRecord, FrameMeta)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    if self.buf.trim().is_empty() {
                        continue;
                    }
                    return Some(self.parse());
                }
                Err(e) => return Some(Err(GaitError::Io(e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &str, fps: f64) -> FrameReader<Cursor<Vec<u8>>> {
        FrameReader::new(Cursor::new(input.as_bytes().to_vec()), fps).unwrap()
    }

    #[test]
    fn test_timestamps_from_frame_index() {
        let input = "{}\n{}\n\n{\"frame\": 10}\n";
        let frames: Vec<_> = reader(input, 10.0).map(|r| r.unwrap().1).collect();

        assert_eq!(frames.len(), 3);
        assert!(frames[0].timestamp.abs() < 1e-12);
        assert!((frames[1].timestamp - 0.1).abs() < 1e-12);
        assert_eq!(frames[2].frame_idx, 10);
        assert!((frames[2].timestamp - 1.0).abs() < 1e-12);
        // Blank line is skipped but still counted for line numbers
        assert_eq!(frames[2].line, 4);
    }

    #[test]
    fn test_missing_index_follows_previous_frame() {
        let input = "{\"frame\": 10}\n{}\n{\"frame\": 15}\n{}\n";
        let frames: Vec<_> = reader(input, 10.0).map(|r| r.unwrap().1).collect();

        let indices: Vec<usize> = frames.iter().map(|m| m.frame_idx).collect();
        assert_eq!(indices, vec![10, 11, 15, 16]);
        assert!((frames[1].timestamp - 1.1).abs() < 1e-12);
        assert!((frames[3].timestamp - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_timestamp_wins() {
        let input = r#"{"frame": 3, "timestamp": 7.25, "dog_score": 0.9}"#;
        let (record, meta) = reader(input, 30.0).next().unwrap().unwrap();
        assert!((meta.timestamp - 7.25).abs() < 1e-12);
        assert_eq!(record.dog_score, Some(0.9));
        assert!(record.pose().unwrap().is_none());
    }

    #[test]
    fn test_record_pose() {
        let input = r#"{"landmarks": [[0.1, 0.2, 0.9], [0.3, 0.4, 0.8]], "orig_shape": [480, 640]}"#;
        let (record, _) = reader(input, 30.0).next().unwrap().unwrap();
        let pose = record.pose().unwrap().unwrap();
        assert_eq!(pose.len(), 2);
        assert_eq!(pose.orig_shape, Some((480, 640)));
    }

    #[test]
    fn test_decreasing_timestamp_is_rejected() {
        let input = "{\"timestamp\": 2.0}\n{\"timestamp\": 1.0}\n";
        let mut frames = reader(input, 30.0);
        assert!(frames.next().unwrap().is_ok());
        let err = frames.next().unwrap().unwrap_err();
        assert!(matches!(err, GaitError::Timestamp(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_negative_timestamp_is_rejected() {
        let err = reader("{\"timestamp\": -0.5}", 30.0)
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, GaitError::Timestamp(_)));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let input = "{}\nnot json\n";
        let mut frames = reader(input, 30.0);
        assert!(frames.next().unwrap().is_ok());
        match frames.next().unwrap() {
            Err(GaitError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_fps() {
        assert!(FrameReader::new(Cursor::new(Vec::new()), 0.0).is_err());
        assert!(FrameReader::new(Cursor::new(Vec::new()), -30.0).is_err());
    }
}
