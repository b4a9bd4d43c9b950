// fieldmask/src/main.rs
//! fieldmask entry point.
//!
//! Parses the command line, initializes logging and the theme, and dispatches
//! to the selected subcommand.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::process::ExitCode;

use fieldmask::cli::{Cli, Commands};
use fieldmask::commands::{check::run_check_command, error_msg, mask::run_mask_command};
use fieldmask::logger;
use fieldmask::ui::theme::{build_theme_map, ThemeMap, ThemeStyle};

fn run(args: Cli, theme_map: &ThemeMap) -> Result<()> {
    match args.command {
        Commands::Mask(cmd) => run_mask_command(cmd, args.quiet, theme_map),
        Commands::Check(cmd) => run_check_command(cmd, args.quiet, theme_map),
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);
    info!("fieldmask started. Version: {}", env!("CARGO_PKG_VERSION"));

    let theme_map = match build_theme_map(args.theme.as_deref()).context("Theme error") {
        Ok(theme_map) => theme_map,
        Err(e) => {
            let fallback = ThemeStyle::default_theme_map();
            error_msg(format!("{:#}", e), &fallback);
            return ExitCode::FAILURE;
        }
    };

    match run(args, &theme_map) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error_msg(format!("{:#}", e), &theme_map);
            ExitCode::FAILURE
        }
    }
}
