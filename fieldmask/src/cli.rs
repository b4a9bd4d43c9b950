// fieldmask/src/cli.rs
//! This file defines the command-line interface (CLI) for the fieldmask application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use fieldmask_core::{Direction, MaskingLevel};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "fieldmask",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mask sensitive fields in JSON request/response documents",
    long_about = "fieldmask replaces the values of sensitive fields in JSON documents with a fixed symbol before they are logged or stored. Fields are named with rule expressions such as `password`, `card.number`, `items[*].voucher` or `tokens[0,2-4]`, given on the command line or in a YAML policy file.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `fieldmask` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Masks one JSON document read from a file or stdin.
    #[command(about = "Masks one JSON document read from a file or stdin.")]
    Mask(MaskCommand),

    /// Compiles rule expressions and prints the merged rule tree.
    #[command(about = "Compiles rule expressions and prints the merged rule tree as JSON.")]
    Check(CheckCommand),
}

/// Masking level as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelChoice {
    /// Leave the document unchanged.
    None,
    /// Replace every top-level field.
    Full,
    /// Replace only the fields named by rules.
    Partial,
}

impl From<LevelChoice> for MaskingLevel {
    fn from(choice: LevelChoice) -> Self {
        match choice {
            LevelChoice::None => MaskingLevel::None,
            LevelChoice::Full => MaskingLevel::Full,
            LevelChoice::Partial => MaskingLevel::Partial,
        }
    }
}

/// Which side of a policy to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionChoice {
    Request,
    Response,
}

impl From<DirectionChoice> for Direction {
    fn from(choice: DirectionChoice) -> Self {
        match choice {
            DirectionChoice::Request => Direction::Request,
            DirectionChoice::Response => Direction::Response,
        }
    }
}

/// Where the masking policy comes from.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PolicySource {
    /// Path to a masking policy file (YAML).
    #[arg(long = "policy", value_name = "FILE", conflicts_with = "policy_name", help = "Path to a masking policy file (YAML).")]
    pub policy: Option<PathBuf>,

    /// Loads a named policy from the policy directories.
    #[arg(long = "policy-name", value_name = "NAME", help = "Loads a named policy from the local policy directories.")]
    pub policy_name: Option<String>,
}

/// Arguments for the `mask` command.
#[derive(Parser, Debug)]
pub struct MaskCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write masked output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub source: PolicySource,

    /// Which side of the policy to apply.
    #[arg(long = "direction", value_enum, default_value = "request", help = "Apply the request or the response side of the policy.")]
    pub direction: DirectionChoice,

    /// Overrides the policy's masking level.
    #[arg(long = "level", short = 'l', value_enum, help = "Masking level (overrides the policy).")]
    pub level: Option<LevelChoice>,

    /// Rule expressions; replace the policy's fields when given.
    #[arg(long = "field", short = 'f', value_name = "RULE", help = "Rule expression naming a field to mask (repeatable; overrides the policy's fields).")]
    pub fields: Vec<String>,

    /// Overrides the policy's replacement symbol.
    #[arg(long = "symbol", short = 's', value_name = "SYMBOL", help = "Replacement for masked values (overrides the policy).")]
    pub symbol: Option<String>,

    /// Pretty-print the masked document.
    #[arg(long = "pretty", help = "Pretty-print the masked JSON document.")]
    pub pretty: bool,

    /// Print the masking report as JSON to stderr.
    #[arg(long = "report", help = "Print the masked paths and skipped rules as JSON to stderr.")]
    pub report: bool,

    /// Fail when a rule does not fit the document's shape.
    #[arg(long = "strict", help = "Exit with an error if any rule does not fit the document's shape.")]
    pub strict: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    #[command(flatten)]
    pub source: PolicySource,

    /// Rule expressions to check instead of the policy's fields.
    #[arg(long = "field", short = 'f', value_name = "RULE", help = "Rule expression to check (repeatable; replaces the policy's fields).")]
    pub fields: Vec<String>,

    /// Only check one side of the policy.
    #[arg(long = "direction", value_enum, help = "Only check the request or the response side of the policy.")]
    pub direction: Option<DirectionChoice>,
}
