//! Module for managing the application's command-line interface (CLI) theme.
//!
//! Users can recolor the status lines fieldmask writes to stderr. Themes are
//! YAML maps from a theme entry to a 16-color ANSI foreground; entries left
//! out of a theme file fall back to the defaults.

use anyhow::{Context, Result};
use owo_colors::AnsiColors;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Type alias for the theme map, providing a consistent type definition.
pub type ThemeMap = HashMap<ThemeEntry, ThemeStyle>;

/// The different logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeEntry {
    /// Style for prominent headers or section titles.
    Header,
    /// Style for successful operation messages.
    Success,
    /// Style for general informational messages.
    Info,
    /// Style for warning messages.
    Warn,
    /// Style for error messages.
    Error,
    /// Style for a masked path in summaries.
    MaskedPath,
    /// Style for a rule skipped because the document's shape did not fit.
    Mismatch,
}

impl ThemeEntry {
    pub const ALL: [ThemeEntry; 7] = [
        ThemeEntry::Header,
        ThemeEntry::Success,
        ThemeEntry::Info,
        ThemeEntry::Warn,
        ThemeEntry::Error,
        ThemeEntry::MaskedPath,
        ThemeEntry::Mismatch,
    ];
}

/// One of the 16 ANSI foreground colors, written in lowercase in theme files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl ThemeColor {
    pub fn to_ansi_color(self) -> AnsiColors {
        match self {
            ThemeColor::Black => AnsiColors::Black,
            ThemeColor::Red => AnsiColors::Red,
            ThemeColor::Green => AnsiColors::Green,
            ThemeColor::Yellow => AnsiColors::Yellow,
            ThemeColor::Blue => AnsiColors::Blue,
            ThemeColor::Magenta => AnsiColors::Magenta,
            ThemeColor::Cyan => AnsiColors::Cyan,
            ThemeColor::White => AnsiColors::White,
            ThemeColor::BrightBlack => AnsiColors::BrightBlack,
            ThemeColor::BrightRed => AnsiColors::BrightRed,
            ThemeColor::BrightGreen => AnsiColors::BrightGreen,
            ThemeColor::BrightYellow => AnsiColors::BrightYellow,
            ThemeColor::BrightBlue => AnsiColors::BrightBlue,
            ThemeColor::BrightMagenta => AnsiColors::BrightMagenta,
            ThemeColor::BrightCyan => AnsiColors::BrightCyan,
            ThemeColor::BrightWhite => AnsiColors::BrightWhite,
        }
    }
}

/// Represents the style configuration for a specific `ThemeEntry`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeStyle {
    pub fg: Option<ThemeColor>,
}

impl ThemeStyle {
    fn fg(color: ThemeColor) -> Self {
        ThemeStyle { fg: Some(color) }
    }

    /// Loads a theme from a YAML file on disk and fills in missing entries from the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ThemeMap> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {}", path.display()))?;
        let mut custom: ThemeMap = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse theme file {}", path.display()))?;

        for (entry, style) in Self::default_theme_map() {
            custom.entry(entry).or_insert(style);
        }
        Ok(custom)
    }

    /// Returns a default theme map with predefined color mappings.
    pub fn default_theme_map() -> ThemeMap {
        ThemeEntry::ALL
            .into_iter()
            .map(|entry| {
                let style = match entry {
                    ThemeEntry::Header => Self::fg(ThemeColor::BrightWhite),
                    ThemeEntry::Success => Self::fg(ThemeColor::Green),
                    ThemeEntry::Info => Self::fg(ThemeColor::White),
                    ThemeEntry::Warn => Self::fg(ThemeColor::Yellow),
                    ThemeEntry::Error => Self::fg(ThemeColor::Red),
                    ThemeEntry::MaskedPath => Self::fg(ThemeColor::Cyan),
                    ThemeEntry::Mismatch => Self::fg(ThemeColor::Magenta),
                };
                (entry, style)
            })
            .collect()
    }
}

/// Loads a theme configuration from a YAML file or returns the default theme.
pub fn build_theme_map(theme_path: Option<&Path>) -> Result<ThemeMap> {
    match theme_path {
        Some(path) => ThemeStyle::load_from_file(path),
        None => Ok(ThemeStyle::default_theme_map()),
    }
}
