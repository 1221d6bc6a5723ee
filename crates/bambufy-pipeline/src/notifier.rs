//! Best-effort side channel to the running printer process.
//!
//! The printer tails a fixed file for summary lines. A failed append is
//! reported and swallowed; file correctness never depends on this channel.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Fixed path the printer process tails for summary lines.
pub const PRINTER_PATH: &str = "/tmp/printer";

/// Environment namespace slicers populate when spawning post-processing
/// hooks. Any variable under it means the run came from slicer automation.
pub const SLICER_ENV_PREFIX: &str = "SLIC3R_";

/// Append UTF-8 text to `path`, creating the file if needed.
pub fn append_to(path: &Path, content: &str) {
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(content.as_bytes()));
    if let Err(e) = result {
        tracing::warn!("failed to append to {}: {}", path.display(), e);
    }
}

/// Append to the fixed printer path.
pub fn notify_printer(content: &str) {
    append_to(Path::new(PRINTER_PATH), content);
}

/// Whether the process was launched from slicer-integrated automation.
pub fn launched_from_slicer() -> bool {
    std::env::vars_os().any(|(key, _)| key.to_string_lossy().starts_with(SLICER_ENV_PREFIX))
}
