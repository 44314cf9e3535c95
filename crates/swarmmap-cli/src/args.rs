//! Command-line argument definitions for the SwarmMap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, output formatting, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the SwarmMap layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input snapshot file
    #[arg(help = "Path to the JSON snapshot")]
    pub input: String,

    /// Path to the output layout file
    #[arg(short, long, default_value = "layout.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Pretty-print the layout document
    #[arg(long)]
    pub pretty: bool,
}
