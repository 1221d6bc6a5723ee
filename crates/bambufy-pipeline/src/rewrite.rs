//! Atomic in-place rewrite of the target file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use bambufy_core::error::{PreprintError, Result};

use crate::summary::Summary;

/// Prepend the derived header to the file, atomically.
///
/// The rewritten content goes to a temporary file in the target's own
/// directory, so the final rename stays on one filesystem; readers see
/// either the fully-old or fully-new file, never a partial rewrite. The
/// original is streamed through rather than loaded, so arbitrarily large
/// files stay cheap. Any write failure drops the temp file and leaves the
/// original untouched.
pub fn rewrite_with_header(path: &Path, checksum: &str, summary: &Summary) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;

    writeln!(tmp, "; MD5:{}", checksum)?;
    writeln!(tmp, "; {}", summary.header)?;
    let mut source = File::open(path)?;
    io::copy(&mut source, tmp.as_file_mut())?;
    tmp.write_all(summary.metadata_block.as_bytes())?;
    tmp.flush()?;

    tmp.persist(path).map_err(|e| PreprintError::ReplaceFailed {
        path: path.display().to_string(),
        reason: e.error.to_string(),
    })?;
    Ok(())
}
