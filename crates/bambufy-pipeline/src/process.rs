//! Pipeline orchestration: scan, summarize, checksum, rewrite, notify.

use std::path::Path;

use bambufy_core::error::Result;

use crate::checksum::content_checksum;
use crate::exclude::first_layer_bounds;
use crate::notifier;
use crate::rewrite::rewrite_with_header;
use crate::scanner::{scan_path, ScanOutcome};
use crate::summary::{build_summary, Summary};

/// What one invocation did to the target file.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The file had been processed by a previous run; nothing was rewritten.
    AlreadyProcessed {
        /// The prior summary payload found in the header.
        payload: String,
    },
    /// The file was rewritten with a fresh header.
    Rewritten {
        /// The summary that now heads the file.
        summary: Summary,
        /// Hex digest embedded above it.
        checksum: String,
    },
}

/// Run the whole pre-print pipeline against one G-code file.
///
/// Reads the file twice: one line pass for metadata, one raw-byte pass for
/// the checksum. The rewrite is atomic; an error anywhere leaves the
/// original file untouched. Printer notification is best-effort and, on the
/// normal completion path, suppressed for runs spawned by slicer automation.
pub fn process_file(path: &Path) -> Result<ProcessOutcome> {
    let meta = match scan_path(path)? {
        ScanOutcome::AlreadyProcessed(payload) => {
            notifier::notify_printer(&format!("{}\n", payload));
            return Ok(ProcessOutcome::AlreadyProcessed { payload });
        }
        ScanOutcome::Scanned(meta) => meta,
    };

    let bounds = first_layer_bounds(meta.first_layer.lines())?;
    let exclude = bounds.map(|b| b.exclude_object_define());
    let summary = build_summary(&meta, exclude.as_deref())?;

    let checksum = content_checksum(path, &summary)?;
    rewrite_with_header(path, &checksum, &summary)?;
    tracing::info!(path = %path.display(), %checksum, "rewrote file with summary header");

    if !notifier::launched_from_slicer() {
        notifier::notify_printer(&format!("{}\n\n", summary.header));
    }

    Ok(ProcessOutcome::Rewritten { summary, checksum })
}
