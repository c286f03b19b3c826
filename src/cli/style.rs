//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Glyph for a successful stage
pub const CHECK: &str = "✓";

/// Glyph for a failed stage
pub const CROSS: &str = "✗";

/// Semantic colours for CLI output
///
/// anstream strips the escape codes when stdout is not a terminal.
pub trait Stylize {
    /// De-emphasized text
    fn muted(&self) -> String;
    /// Headings
    fn emphasis(&self) -> String;
    /// Names and numbers worth noticing
    fn accent(&self) -> String;
    /// Success
    fn success(&self) -> String;
    /// Warnings
    fn warn(&self) -> String;
    /// Errors
    fn error(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn error(&self) -> String {
        self.red().bold().to_string()
    }
}

/// Coloured check mark
pub fn check() -> String {
    CHECK.success()
}

/// Coloured cross
pub fn cross() -> String {
    CROSS.error()
}

/// Spinner style shared by all phases
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
