//! `mask` command implementation: masks one JSON document.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use fieldmask_core::{
    Direction, FieldMaskError, MaskingEngine, MaskingLevel, MaskingPolicy, RuleCache, RuleEngine,
};

use super::{info_msg, load_policy, warn_msg};
use crate::cli::MaskCommand;
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

/// Options for the `run_mask_opts` API.
pub struct MaskOptions {
    pub input: String,
    pub output_path: Option<PathBuf>,
    pub pretty: bool,
    pub report: bool,
    pub strict: bool,
    pub quiet: bool,
}

/// Applies command-line overrides to one direction of `policy`.
///
/// Fields given without a level on a policy whose level is `none` switch that
/// direction to `partial`, so `fieldmask mask -f password` masks `password`.
pub fn apply_overrides(
    policy: &mut MaskingPolicy,
    direction: Direction,
    level: Option<MaskingLevel>,
    fields: &[String],
    symbol: Option<&str>,
) {
    if let Some(symbol) = symbol {
        policy.symbol = symbol.to_string();
    }
    let spec = policy.spec_mut(direction);
    if !fields.is_empty() {
        spec.fields = fields.to_vec();
        if level.is_none() && spec.level == MaskingLevel::None {
            debug!("Fields given without a level; using 'partial' for {}.", direction);
            spec.level = MaskingLevel::Partial;
        }
    }
    if let Some(level) = level {
        spec.level = level;
    }
}

fn read_input(input_file: Option<&Path>) -> Result<String> {
    match input_file {
        Some(path) => {
            info!("Reading input from file: {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            info!("Reading input from stdin...");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Entry point for `fieldmask mask`.
pub fn run_mask_command(cmd: MaskCommand, quiet: bool, theme_map: &ThemeMap) -> Result<()> {
    let direction: Direction = cmd.direction.into();
    let mut policy = load_policy(&cmd.source)?;
    apply_overrides(
        &mut policy,
        direction,
        cmd.level.map(Into::into),
        &cmd.fields,
        cmd.symbol.as_deref(),
    );

    let spec = policy.spec(direction);
    if !quiet {
        match spec.level {
            MaskingLevel::None => warn_msg(
                format!("Masking level for {} is 'none'; the document passes through unchanged.", direction),
                theme_map,
            ),
            MaskingLevel::Partial if spec.fields.is_empty() => warn_msg(
                "Masking level is 'partial' but no fields are given. Nothing will be masked.",
                theme_map,
            ),
            _ => {}
        }
    }

    let cache = RuleCache::new();
    let engine = RuleEngine::from_policy(&policy, direction, &cache)?;
    let input = read_input(cmd.input_file.as_deref())?;

    run_mask_opts(
        &engine,
        MaskOptions {
            input,
            output_path: cmd.output,
            pretty: cmd.pretty,
            report: cmd.report,
            strict: cmd.strict,
            quiet,
        },
        theme_map,
    )
}

/// Masks `opts.input` with `engine` and writes the result.
pub fn run_mask_opts(engine: &dyn MaskingEngine, opts: MaskOptions, theme_map: &ThemeMap) -> Result<()> {
    info!("Starting mask operation.");

    if opts.input.trim().is_empty() {
        return Err(anyhow::Error::new(FieldMaskError::EmptyInput).context("Nothing to mask"));
    }
    let document: Value = serde_json::from_str(&opts.input)
        .map_err(FieldMaskError::from)
        .context("Input is not a valid JSON document")?;

    let outcome = engine.mask_with_report(&document);
    let report = outcome.report.clone();
    debug!(
        "Masked {} path(s) at level '{}'; {} rule(s) skipped.",
        report.masked_count(),
        engine.level(),
        report.mismatches.len()
    );

    if opts.report {
        let rendered = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        eprintln!("{}", rendered);
    }

    let masked = if opts.strict {
        outcome
            .into_strict()
            .context("A rule did not fit the document's shape (--strict)")?
    } else {
        outcome.value
    };

    handle_primary_output(&opts, &masked, theme_map)?;

    if !opts.quiet && !opts.report {
        let stderr_supports_color = io::stderr().is_terminal();
        output_format::print_mask_summary(&mut io::stderr(), &report, theme_map, stderr_supports_color)?;
        if !report.is_clean() {
            warn_msg(
                format!(
                    "{} rule(s) did not fit the document's shape and were skipped.",
                    report.mismatches.len()
                ),
                theme_map,
            );
        }
    }

    info!("Mask operation completed.");
    Ok(())
}

fn render(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("Failed to serialize masked document")
}

fn handle_primary_output(opts: &MaskOptions, masked: &Value, theme_map: &ThemeMap) -> Result<()> {
    let rendered = render(masked, opts.pretty)?;
    if let Some(path) = &opts.output_path {
        if !opts.quiet {
            info_msg(format!("Writing masked document to file: {}", path.display()), theme_map);
        }
        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        writeln!(file, "{}", rendered)?;
    } else {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        writeln!(writer, "{}", rendered)?;
    }
    Ok(())
}
