// fieldmask/src/commands/mod.rs
//! Subcommand implementations and the helpers they share.

pub mod check;
pub mod mask;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;
use std::io;

use fieldmask_core::{load_policy_by_name, MaskingPolicy};

use crate::cli::PolicySource;
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing success messages to stderr.
pub fn success_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Loads the policy named by `source`, or the default policy when none is given.
pub fn load_policy(source: &PolicySource) -> Result<MaskingPolicy> {
    match (&source.policy, &source.policy_name) {
        (Some(path), _) => MaskingPolicy::load_from_file(path),
        (None, Some(name)) => load_policy_by_name(name)
            .with_context(|| format!("Failed to load policy '{}'", name)),
        (None, None) => {
            debug!("No policy given; starting from the default policy.");
            Ok(MaskingPolicy::default())
        }
    }
}
