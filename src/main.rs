use std::path::PathBuf;

use clap::Parser;

use bambufy::{init_logging, process_file, ProcessOutcome};

/// Pre-print processor for slicer-emitted G-code.
///
/// Derives a printer-consumable summary header from slicer metadata and
/// prepends it to the file in place. Safe to re-run: already-processed
/// files are detected and left untouched.
#[derive(Parser)]
#[command(name = "bambufy", version, about, long_about = None)]
struct Cli {
    /// Path to the G-code file to process
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();

    match process_file(&cli.file)? {
        ProcessOutcome::AlreadyProcessed { payload } => {
            println!("Already post-processed");
            println!("{}", payload);
        }
        ProcessOutcome::Rewritten { summary, .. } => {
            println!("{}", summary.header);
        }
    }

    Ok(())
}
