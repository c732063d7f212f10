//! # Outcome Rendering
//!
//! Formats a `BuildOutcome` for the terminal, either as a styled status line
//! or as the JSON response record.
//!
//! ## Respecting User Preferences
//!
//! Styling follows the `--color=never|always|auto` flag. In auto mode it is
//! disabled when:
//! - `NO_COLOR` is set (per https://no-color.org/)
//! - `CLICOLOR=0` is set
//! - `TERM=dumb` is set
//! - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)

use std::env;

use console::style;

use crate::request::{BuildOutcome, StatusCode};

/// Output configuration for controlling colors and symbols.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and symbols should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never" or "auto".
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// One status line for a finished build.
pub fn format_outcome(config: &OutputConfig, name: &str, outcome: &BuildOutcome) -> String {
    let (label, symbol) = match outcome.code {
        StatusCode::Success => ("SUCCESS", "✔"),
        StatusCode::Failure => ("FAILURE", "✘"),
    };

    if !config.use_color {
        return format!("[{}] {}: {}", label, name, outcome.message);
    }

    let symbol = match outcome.code {
        StatusCode::Success => style(symbol).green().bold(),
        StatusCode::Failure => style(symbol).red().bold(),
    };
    format!("{} {}: {}", symbol, style(name).bold(), outcome.message)
}

/// The response record as pretty-printed JSON.
pub fn format_outcome_json(outcome: &BuildOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}
