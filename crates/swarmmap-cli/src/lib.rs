//! CLI logic for the SwarmMap layout tool.
//!
//! Reads a JSON snapshot, lays it out and writes the layout document.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::{ConfigError, load_config};

use std::fs;

use log::{info, warn};

use swarmmap::{SwarmMapError, TopologyBuilder};

use error_adapter::{render, warning_reportables};

/// Run the SwarmMap CLI application
///
/// This function processes the input snapshot through the SwarmMap pipeline
/// and writes the resulting layout document to the output file. Snapshot
/// warnings are logged and do not stop the run.
///
/// # Errors
///
/// Returns `SwarmMapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Snapshot errors
/// - Layout errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), SwarmMapError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing snapshot"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = TopologyBuilder::new(app_config);
    let (snapshot, warnings) = builder.parse_with_warnings(&source)?;
    for reportable in warning_reportables(&warnings, &source) {
        warn!("{}", render(&reportable));
    }

    let json = builder.render_json(&snapshot, args.pretty)?;

    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}
