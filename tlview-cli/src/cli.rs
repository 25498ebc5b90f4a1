//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// tlview -- structured trace log viewer.
///
/// Use `tlview <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "tlview", version, about, long_about = None)]
pub struct Cli {
    /// Path to the tlview.toml configuration file (defaults apply if missing).
    #[arg(short, long, default_value = "tlview.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a trace log from a file, URL, or stdin and persist it.
    Load(LoadArgs),

    /// Render the persisted (or a given) dataset as a filtered table.
    View(ViewArgs),

    /// Summarize event keys, frames, and columns of a dataset.
    Summary(SummaryArgs),

    /// Drop the persisted dataset.
    Clear,

    /// Manage configuration.
    Config(ConfigArgs),
}

/// Decode options shared by commands that parse input.
#[derive(Args, Debug, Clone, Copy)]
pub struct DecodeArgs {
    /// Skip malformed lines instead of failing the whole load.
    #[arg(long)]
    pub lenient: bool,
}

// ---- load ----

/// Load a trace log and persist it for later commands.
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// File path, http(s) URL, or `-` for stdin.
    pub source: String,

    #[command(flatten)]
    pub decode: DecodeArgs,
}

// ---- view ----

/// Render a filtered table.
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Read from this source instead of the persisted dataset (not persisted).
    #[arg(long)]
    pub source: Option<String>,

    /// Event key filter (`all` for every event).
    #[arg(long, default_value = "all")]
    pub event: String,

    /// Frame identity filter, e.g. `0/0` or `1/2_3` (`all` for every frame).
    #[arg(long, default_value = "all")]
    pub frame: String,

    /// Include hidden diagnostic columns (timestamp, pathname, ...).
    #[arg(long)]
    pub show_all: bool,

    /// Hide a dynamic column (repeatable).
    #[arg(long = "hide", value_name = "COL")]
    pub hide: Vec<String>,

    /// Show only these dynamic columns (repeatable).
    #[arg(long = "only", value_name = "COL", conflicts_with = "hide")]
    pub only: Vec<String>,

    /// Maximum number of rows to print.
    #[arg(long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub decode: DecodeArgs,
}

// ---- summary ----

/// Summarize a dataset.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Read from this source instead of the persisted dataset (not persisted).
    #[arg(long)]
    pub source: Option<String>,

    #[command(flatten)]
    pub decode: DecodeArgs,
}

// ---- config ----

/// Manage tlview configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, source, decode, store, schema).
        #[arg(long)]
        section: Option<String>,
    },
}
