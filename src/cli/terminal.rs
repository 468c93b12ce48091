//! Terminal capability detection and styling

use owo_colors::{OwoColorize, colors::css};

/// Below this many columns, output drops identifiers and stacks fields.
const NARROW_COLUMNS: u16 = 60;

fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Terminal width in columns, if stdout is a terminal.
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < NARROW_COLUMNS)
}

/// Shorten `text` to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Green
    fn success(&self) -> String;
    /// Amber
    fn warning(&self) -> String;
    /// Red
    fn error(&self) -> String;
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn error(&self) -> String {
        if supports_color() {
            self.fg::<css::Red>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn error(&self) -> String {
        self.as_str().error()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}
