// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `miniflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "miniflow",
    version,
    about = "Animate a workflow dependency graph tick by tick.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Miniflow.toml` in the current working directory, unless
    /// `--graph` is given.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Inline graph, e.g. "a => b => c // b & c => d".
    ///
    /// Replaces any graph from the config file.
    #[arg(long, value_name = "GRAPH")]
    pub graph: Option<String>,

    /// Delay between ticks in milliseconds.
    #[arg(long, value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Colour theme ("default", "demo").
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Stop after this many completed rounds (0 loops forever).
    #[arg(long, value_name = "N")]
    pub rounds: Option<u64>,

    /// Disable ANSI colours in the output.
    #[arg(long)]
    pub no_color: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MINIFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse and compile the graph, print it, but don't simulate.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the graph in graphviz dot format and exit.
    #[arg(long)]
    pub dot: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
