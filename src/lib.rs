//! # Bambufy
//!
//! Pre-print processor for slicer-emitted G-code:
//! - Detects the source slicer (BambuStudio, OrcaSlicer) from header comments
//! - Extracts filament colours, types, feedrates, tool usage, and version
//! - Derives a first-layer bounding box as a firmware exclusion zone
//! - Prepends a checksummed `_IFS_COLORS` summary header, atomically and
//!   idempotently
//! - Forwards the summary to the running printer over a side file
//!
//! ## Architecture
//!
//! Bambufy is organized as a workspace with two library crates:
//!
//! 1. **bambufy-core** - dialect detection, field parsers, units, errors
//! 2. **bambufy-pipeline** - scanner, bounding box, summary, checksum,
//!    atomic rewrite, printer notification
//!
//! The binary in this crate is glue: argument parsing, logging setup, and
//! outcome reporting.

pub use bambufy_core::{PreprintError, Result, SlicerFamily};
pub use bambufy_pipeline::{process_file, ProcessOutcome, Summary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - stderr output, so stdout carries only the machine-readable summary
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
