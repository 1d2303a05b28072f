//! Semantic color palette for terminal output.

use owo_colors::{OwoColorize, Style};

/// Trait extension to apply semantic styles.
///
/// Every method falls back to plain text when colors are disabled.
pub trait SemanticStyle: std::fmt::Display {
    /// Green bold, for accepted tokens and completed steps.
    fn success(&self) -> String {
        paint(self, Style::new().green().bold())
    }

    /// Red bold.
    fn error(&self) -> String {
        paint(self, Style::new().red().bold())
    }

    /// Yellow, for correctable problems such as skipped groups.
    fn warning(&self) -> String {
        paint(self, Style::new().yellow())
    }

    /// Dimmed secondary text.
    fn muted(&self) -> String {
        paint(self, Style::new().dimmed())
    }

    fn header(&self) -> String {
        paint(self, Style::new().bold())
    }

    /// Blue, for tokens and paths.
    fn code(&self) -> String {
        paint(self, Style::new().blue())
    }
}

impl<T: std::fmt::Display + ?Sized> SemanticStyle for T {}

fn paint<T: std::fmt::Display + ?Sized>(value: &T, style: Style) -> String {
    if super::no_color() {
        value.to_string()
    } else {
        value.style(style).to_string()
    }
}
