// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::GaitConfig;
use crate::error::Result;
use crate::landmarks::KeypointLayout;

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Analyze Options:
    --source, -s <SOURCE>         Per-frame landmarks as JSON lines, or '-' for stdin
    --fps <FPS>                   Frame rate for frames without timestamps [default: 30]
    --layout <LAYOUT>             Keypoint layout (mediapipe, coco) [default: mediapipe]
    --knee-threshold <VALUE>      Knee height difference for injured gait [default: 0.1]
    --injury-fraction <VALUE>     Injured share above which the verdict is Injured [default: 0.2]
    --min-detected <SECONDS>      Detected time needed for a verdict [default: 5]
    --dog-threshold <VALUE>       Dog classifier score a frame must exceed [default: 0.5]
    --min-keypoint-conf <VALUE>   Landmark confidence floor [default: 0]
    --config, -c <FILE>           TOML file with any of the settings above
    --json                        Print the summary as JSON
    --save <FILE>                 Write the JSON summary to a file
    --verbose <BOOL>              Show per-frame status [default: true]

Examples:
    dog-gait analyze --source walk.jsonl
    dog-gait analyze -s walk.jsonl --fps 60 --layout coco
    dog-gait analyze -s walk.jsonl --knee-threshold 0.08 --json --verbose false
    pose-extractor video.mov | dog-gait analyze -s - --save report.json"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Time healthy and injured gait in a stream of per-frame pose landmarks
    Analyze(AnalyzeArgs),
}

/// Arguments for the analyze command.
///
/// Threshold options are optional so that values from `--config` survive unless
/// overridden on the command line.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Per-frame landmarks as JSON lines, or '-' for stdin
    #[arg(short, long)]
    pub source: String,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frame rate used for frames without a timestamp
    #[arg(long)]
    pub fps: Option<f64>,

    /// Keypoint layout of the pose model (mediapipe, coco)
    #[arg(long)]
    pub layout: Option<KeypointLayout>,

    /// Knee height difference (normalized) above which a frame is injured
    #[arg(long)]
    pub knee_threshold: Option<f32>,

    /// Injured share of labelled time above which the verdict is Injured
    #[arg(long)]
    pub injury_fraction: Option<f64>,

    /// Detected seconds required for a conclusive verdict
    #[arg(long = "min-detected")]
    pub min_detected_secs: Option<f64>,

    /// Dog classifier score a frame must exceed to count as detected
    #[arg(long)]
    pub dog_threshold: Option<f32>,

    /// Landmarks below this confidence are treated as missing
    #[arg(long)]
    pub min_keypoint_conf: Option<f32>,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write the JSON summary to this file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Show per-frame status
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

impl AnalyzeArgs {
    /// Whether per-frame status and headers are printed.
    ///
    /// `--json` keeps stdout to the JSON document alone.
    #[must_use]
    pub const fn verbose_output(&self) -> bool {
        self.verbose && !self.json
    }

    /// Resolve the configuration: defaults, then `--config`, then command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or a value is out of range.
    pub fn resolve_config(&self) -> Result<GaitConfig> {
        let mut config = match &self.config {
            Some(path) => GaitConfig::load(path)?,
            None => GaitConfig::default(),
        };

        if let Some(fps) = self.fps {
            config = config.with_fps(fps);
        }
        if let Some(layout) = self.layout {
            config = config.with_layout(layout);
        }
        if let Some(t) = self.knee_threshold {
            config = config.with_knee_threshold(t);
        }
        if let Some(f) = self.injury_fraction {
            config = config.with_injury_fraction(f);
        }
        if let Some(s) = self.min_detected_secs {
            config = config.with_min_detected_secs(s);
        }
        if let Some(t) = self.dog_threshold {
            config = config.with_dog_threshold(t);
        }
        if let Some(c) = self.min_keypoint_conf {
            config = config.with_min_keypoint_conf(c);
        }

        config.validate()?;
        Ok(config)
    }
}
