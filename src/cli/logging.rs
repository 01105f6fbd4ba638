// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Terminal output for the CLI.
//!
//! Per-frame gait status, headers and config echo go through [`status!`](crate::status),
//! [`section!`](crate::section) and [`verbose!`](crate::verbose). `--verbose false` and
//! `--json` silence all three. Warnings and errors go to stderr and are always shown.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::{ColoredString, Colorize};

use crate::gait::{GaitLabel, Verdict};
use crate::posture::Assessment;
use crate::source::FrameMeta;

/// Whether per-frame output is enabled.
static VERBOSE: AtomicBool = AtomicBool::new(true);

/// Enable or disable per-frame output.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

/// Check if per-frame output is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Terminal coloring for gait outcomes.
pub trait Paint {
    /// The value as colored terminal text.
    fn paint(&self) -> ColoredString;
}

impl Paint for GaitLabel {
    fn paint(&self) -> ColoredString {
        match self {
            Self::Healthy => self.as_str().green().bold(),
            Self::Injured => self.as_str().red().bold(),
        }
    }
}

impl Paint for Verdict {
    fn paint(&self) -> ColoredString {
        match self {
            Self::Healthy => "Healthy".green().bold(),
            Self::Injured => "Injured".red().bold(),
            Self::Inconclusive => "Inconclusive".yellow().bold(),
        }
    }
}

impl Paint for Assessment {
    fn paint(&self) -> ColoredString {
        match self {
            Self::Gait(label) => label.paint(),
            other => other.to_string().dimmed(),
        }
    }
}

/// One status line for a frame, e.g. `frame 12 0.40s: Status: Healthy`.
#[must_use]
pub fn status_line(meta: &FrameMeta, assessment: &Assessment) -> String {
    let outcome = match assessment {
        Assessment::Gait(_) => format!("Status: {}", assessment.paint()),
        _ => assessment.paint().to_string(),
    };
    format!("frame {} {:.2}s: {outcome}", meta.frame_idx, meta.timestamp)
}

/// Print the gait status of one frame.
#[macro_export]
macro_rules! status {
    ($meta:expr, $assessment:expr) => {{
        if $crate::cli::logging::is_verbose() {
            println!("{}", $crate::cli::logging::status_line($meta, $assessment));
        }
    }};
}

/// Macro for warning messages.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{} {}", "WARNING ⚠️".yellow().bold(), format!($($arg)*));
    }};
}

/// Macro for error messages.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{} {}", "Error:".red().bold(), format!($($arg)*));
    }};
}

/// Macro for success messages.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        println!("{} {}", "✅".green(), format!($($arg)*));
    }};
}

/// Macro for verbose messages.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {{
        if $crate::cli::logging::is_verbose() {
            println!("{}", format!($($arg)*));
        }
    }};
}

/// Macro for section headers.
#[macro_export]
macro_rules! section {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        if $crate::cli::logging::is_verbose() {
            println!();
            println!("{}", format!($($arg)*).cyan().bold());
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(frame_idx: usize, timestamp: f64) -> FrameMeta {
        FrameMeta {
            frame_idx,
            timestamp,
            line: frame_idx + 1,
        }
    }

    #[test]
    fn test_verbosity_toggle() {
        set_verbose(true);
        assert!(is_verbose());

        set_verbose(false);
        assert!(!is_verbose());

        set_verbose(true);
        assert!(is_verbose());
    }

    #[test]
    fn test_paint_keeps_text() {
        assert!(GaitLabel::Injured.paint().to_string().contains("Injured"));
        assert!(Verdict::Inconclusive.paint().to_string().contains("Inconclusive"));
        assert!(Assessment::NotDog.paint().to_string().contains("no dog"));
    }

    #[test]
    fn test_status_line() {
        let line = status_line(&meta(12, 0.4), &Assessment::Gait(GaitLabel::Healthy));
        assert!(line.starts_with("frame 12 0.40s: Status: "));
        assert!(line.contains("Healthy"));

        let line = status_line(&meta(3, 0.1), &Assessment::MissingLandmarks);
        assert!(line.starts_with("frame 3 0.10s: "));
        assert!(line.contains("missing landmarks"));
        assert!(!line.contains("Status"));
    }
}
