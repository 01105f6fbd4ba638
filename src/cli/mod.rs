// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for gait analysis.
//!
//! This module contains the command-line interface logic, including argument parsing,
//! terminal logging, and the `analyze` command implementation.

// Modules
/// Analysis logic.
pub mod analyze;

/// CLI arguments.
pub mod args;

/// Terminal output macros and verbosity control.
pub mod logging;
