// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Gait duration accumulation.
//!
//! A [`GaitAccumulator`] folds an ordered stream of per-frame [`Sample`]s into three
//! running totals: time spent in healthy gait, time spent in injured gait, and time the
//! subject was detected at all. Durations are summed over intervals between state
//! transitions, not over frame counts, so the same set of samples in a different order
//! can produce different totals.
//!
//! # Example
//!
//! ```rust
//! use dog_gait::{GaitAccumulator, GaitConfig, GaitLabel, Sample, Verdict};
//!
//! let mut acc = GaitAccumulator::new();
//! for i in 0..=60 {
//!     acc.observe(Sample::detected(f64::from(i) * 0.1, GaitLabel::Healthy));
//! }
//! acc.finalize(6.0);
//!
//! let totals = acc.totals();
//! assert_eq!(totals.classify(&GaitConfig::default()), Verdict::Healthy);
//! ```

use std::fmt;

use serde::Serialize;

use crate::config::GaitConfig;

/// Per-frame gait label of a detected subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GaitLabel {
    Healthy,
    Injured,
}

impl GaitLabel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Injured => "Injured",
        }
    }
}

impl fmt::Display for GaitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One frame's observation.
///
/// `label` is `Some` iff the subject was detected in the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Frame time in seconds.
    pub timestamp: f64,
    /// Gait label when detected, `None` otherwise.
    pub label: Option<GaitLabel>,
}

impl Sample {
    /// A frame in which the subject was detected with the given gait label.
    #[must_use]
    pub const fn detected(timestamp: f64, label: GaitLabel) -> Self {
        Self {
            timestamp,
            label: Some(label),
        }
    }

    /// A frame without a plausible subject.
    #[must_use]
    pub const fn missing(timestamp: f64) -> Self {
        Self {
            timestamp,
            label: None,
        }
    }

    #[must_use]
    pub const fn is_detected(&self) -> bool {
        self.label.is_some()
    }
}

/// Final gait classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    Healthy,
    Injured,
    Inconclusive,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Healthy => "Healthy",
            Self::Injured => "Injured",
            Self::Inconclusive => "Inconclusive",
        })
    }
}

/// Open intervals of the accumulator.
///
/// While tracking, both the detected interval and exactly one gait interval are open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TrackingState {
    /// No interval open.
    #[default]
    Idle,
    /// Subject detected since `detected_since`, healthy since `since`.
    Healthy { detected_since: f64, since: f64 },
    /// Subject detected since `detected_since`, injured since `since`.
    Injured { detected_since: f64, since: f64 },
}

impl TrackingState {
    /// Start of the open detected interval, if any.
    #[must_use]
    pub const fn detected_since(&self) -> Option<f64> {
        match *self {
            Self::Idle => None,
            Self::Healthy { detected_since, .. } | Self::Injured { detected_since, .. } => {
                Some(detected_since)
            }
        }
    }

    /// Label of the open gait interval, if any.
    #[must_use]
    pub const fn label(&self) -> Option<GaitLabel> {
        match self {
            Self::Idle => None,
            Self::Healthy { .. } => Some(GaitLabel::Healthy),
            Self::Injured { .. } => Some(GaitLabel::Injured),
        }
    }
}

/// Accumulated durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GaitTotals {
    pub healthy: f64,
    pub injured: f64,
    pub detected: f64,
}

impl GaitTotals {
    /// Time carrying a gait label.
    #[must_use]
    pub fn labelled(&self) -> f64 {
        self.healthy + self.injured
    }

    /// Injured share of labelled time, or `None` when nothing was labelled.
    #[must_use]
    pub fn injury_fraction(&self) -> Option<f64> {
        let labelled = self.labelled();
        (labelled > 0.0).then(|| self.injured / labelled)
    }

    /// Reduce the totals to a verdict.
    ///
    /// `Inconclusive` when the subject was detected for less than
    /// `config.min_detected_secs` or no time carries a label.
    #[must_use]
    pub fn classify(&self, config: &GaitConfig) -> Verdict {
        if self.detected < config.min_detected_secs {
            return Verdict::Inconclusive;
        }
        match self.injury_fraction() {
            None => Verdict::Inconclusive,
            Some(fraction) if fraction <= config.injury_fraction => Verdict::Healthy,
            Some(_) => Verdict::Injured,
        }
    }
}

/// Folds samples into gait durations.
#[derive(Debug, Clone, Default)]
pub struct GaitAccumulator {
    totals: GaitTotals,
    state: TrackingState,
    last_timestamp: Option<f64>,
}

impl GaitAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one sample.
    ///
    /// A missing subject closes every open interval. A detected subject opens the detected
    /// interval if needed and switches the gait interval when the label changes.
    pub fn observe(&mut self, sample: Sample) {
        let t = sample.timestamp;
        self.last_timestamp = Some(t);

        self.state = match (self.state, sample.label) {
            (state, None) => {
                self.close(state, t);
                TrackingState::Idle
            }
            (TrackingState::Idle, Some(GaitLabel::Healthy)) => TrackingState::Healthy {
                detected_since: t,
                since: t,
            },
            (TrackingState::Idle, Some(GaitLabel::Injured)) => TrackingState::Injured {
                detected_since: t,
                since: t,
            },
            (state @ TrackingState::Healthy { .. }, Some(GaitLabel::Healthy))
            | (state @ TrackingState::Injured { .. }, Some(GaitLabel::Injured)) => state,
            (TrackingState::Healthy { detected_since, since }, Some(GaitLabel::Injured)) => {
                self.totals.healthy += span(since, t);
                TrackingState::Injured {
                    detected_since,
                    since: t,
                }
            }
            (TrackingState::Injured { detected_since, since }, Some(GaitLabel::Healthy)) => {
                self.totals.injured += span(since, t);
                TrackingState::Healthy {
                    detected_since,
                    since: t,
                }
            }
        };
    }

    /// Close every open interval at `last_timestamp`.
    ///
    /// Leaves the accumulator idle, so a repeated call changes nothing.
    pub fn finalize(&mut self, last_timestamp: f64) {
        self.close(self.state, last_timestamp);
        self.state = TrackingState::Idle;
    }

    /// Close every open interval at the last observed timestamp and return the totals.
    #[must_use]
    pub fn finish(mut self) -> GaitTotals {
        if let Some(t) = self.last_timestamp {
            self.finalize(t);
        }
        self.totals
    }

    /// Totals of closed intervals.
    #[must_use]
    pub const fn totals(&self) -> GaitTotals {
        self.totals
    }

    #[must_use]
    pub const fn state(&self) -> TrackingState {
        self.state
    }

    /// Timestamp of the most recent sample.
    #[must_use]
    pub const fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Classify the closed totals.
    #[must_use]
    pub fn classify(&self, config: &GaitConfig) -> Verdict {
        self.totals.classify(config)
    }

    fn close(&mut self, state: TrackingState, t: f64) {
        match state {
            TrackingState::Idle => {}
            TrackingState::Healthy { detected_since, since } => {
                self.totals.healthy += span(since, t);
                self.totals.detected += span(detected_since, t);
            }
            TrackingState::Injured { detected_since, since } => {
                self.totals.injured += span(since, t);
                self.totals.detected += span(detected_since, t);
            }
        }
    }
}

/// Interval length, clamped so totals never decrease.
fn span(start: f64, end: f64) -> f64 {
    (end - start).max(0.0)
}
