//! Terminal capability detection and styling of domain values

use bloodlink::{Urgency, domain::StockLevel};
use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(w, _)| w.0 < 60)
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as danger (red, bold)
    fn danger(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        paint(self, |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self, |s| s.fg::<css::Orange>().to_string())
    }

    fn danger(&self) -> String {
        paint(self, |s| s.fg::<css::Crimson>().bold().to_string())
    }

    fn info(&self) -> String {
        paint(self, |s| s.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self) -> String {
        paint(self, |s| s.dimmed().to_string())
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn danger(&self) -> String {
        self.as_str().danger()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Urgency label padded to `width`, red for emergencies.
///
/// Padding is applied before coloring so table columns stay aligned.
pub fn urgency(urgency: Urgency, width: usize) -> String {
    match urgency {
        Urgency::Emergency => format!("{:<width$}", "EMERGENCY").danger(),
        Urgency::Normal => format!("{:<width$}", "normal"),
    }
}

/// Stock level label padded to `width`, colored by severity.
pub fn stock_level(level: StockLevel, width: usize) -> String {
    let label = format!("{level:<width$}");
    match level {
        StockLevel::Critical => label.danger(),
        StockLevel::Low => label.warning(),
        StockLevel::Stable => label.success(),
    }
}

/// Eligibility marker.
pub fn eligibility(eligible: bool) -> String {
    if eligible {
        "eligible".success()
    } else {
        "not eligible".warning()
    }
}
