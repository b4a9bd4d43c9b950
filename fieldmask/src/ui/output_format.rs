//! Formatting helpers for the status lines fieldmask writes to stderr.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use fieldmask_core::MaskReport;

use super::theme::{ThemeColor, ThemeEntry, ThemeMap};

/// Writes `text` in the theme's color for `entry`, or plain when color is off.
fn write_styled<W: Write>(
    writer: &mut W,
    text: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    let color = theme
        .get(&entry)
        .and_then(|style| style.fg)
        .map(ThemeColor::to_ansi_color);
    match color {
        Some(color) if enable_colors => write!(writer, "{}", text.color(color)),
        _ => write!(writer, "{}", text),
    }
}

fn print_prefixed<W: Write>(
    writer: &mut W,
    prefix: &str,
    message: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    write_styled(writer, prefix, entry, theme, enable_colors)?;
    writeln!(writer, " {}", message)
}

pub fn print_info_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_prefixed(writer, "[info]", message, ThemeEntry::Info, theme, enable_colors)
}

pub fn print_success_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_prefixed(writer, "[ok]", message, ThemeEntry::Success, theme, enable_colors)
}

pub fn print_warn_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_prefixed(writer, "[warn]", message, ThemeEntry::Warn, theme, enable_colors)
}

pub fn print_error_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_prefixed(writer, "[error]", message, ThemeEntry::Error, theme, enable_colors)
}

/// Prints a human-readable summary of a masking pass.
pub fn print_mask_summary<W: Write>(
    writer: &mut W,
    report: &MaskReport,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    write_styled(writer, "Masking Summary:", ThemeEntry::Header, theme, enable_colors)?;
    writeln!(writer)?;
    if report.masked_paths.is_empty() {
        writeln!(writer, "  No fields were masked.")?;
    }
    for path in &report.masked_paths {
        write!(writer, "  masked  ")?;
        write_styled(writer, path, ThemeEntry::MaskedPath, theme, enable_colors)?;
        writeln!(writer)?;
    }
    for mismatch in &report.mismatches {
        write!(writer, "  skipped ")?;
        write_styled(writer, &mismatch.path, ThemeEntry::Mismatch, theme, enable_colors)?;
        writeln!(
            writer,
            " (rule expects {}, found {})",
            mismatch.expected, mismatch.found
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeStyle;
    use fieldmask_core::ShapeMismatch;

    #[test]
    fn plain_output_has_no_escape_codes() {
        let theme = ThemeStyle::default_theme_map();
        let mut out = Vec::new();
        print_warn_message(&mut out, "careful", &theme, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[warn] careful\n");
    }

    #[test]
    fn colored_output_wraps_prefix() {
        let theme = ThemeStyle::default_theme_map();
        let mut out = Vec::new();
        print_error_message(&mut out, "boom", &theme, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\u{1b}'));
        assert!(text.ends_with(" boom\n"));
    }

    #[test]
    fn summary_lists_paths_and_mismatches() {
        let theme = ThemeStyle::default_theme_map();
        let report = MaskReport {
            masked_paths: vec!["b.c".to_string()],
            mismatches: vec![ShapeMismatch {
                path: "d".to_string(),
                expected: "array",
                found: "string",
            }],
        };
        let mut out = Vec::new();
        print_mask_summary(&mut out, &report, &theme, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("masked  b.c"));
        assert!(text.contains("skipped d (rule expects array, found string)"));
    }
}
