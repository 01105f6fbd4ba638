// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the gait library.

use std::fmt;

/// Result type alias for gait operations.
pub type Result<T> = std::result::Result<T, GaitError>;

/// Main error type for the gait library.
#[derive(Debug)]
pub enum GaitError {
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
    /// Malformed frame record on the given (1-based) input line.
    Parse {
        /// Input line number.
        line: usize,
        /// Parser message.
        msg: String,
    },
    /// Timestamp that is not finite, negative, or earlier than the previous frame.
    Timestamp(String),
    /// Invalid configuration provided.
    Config(String),
    /// Landmark data with an unusable shape.
    Landmark(String),
}

impl fmt::Display for GaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Parse { line, msg } => write!(f, "Parse error on line {line}: {msg}"),
            Self::Timestamp(msg) => write!(f, "Timestamp error: {msg}"),
            Self::Config(msg) => write!(f, "Config error: {msg}"),
            Self::Landmark(msg) => write!(f, "Landmark error: {msg}"),
        }
    }
}

impl std::error::Error for GaitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GaitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for GaitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            line: err.line(),
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for GaitError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
