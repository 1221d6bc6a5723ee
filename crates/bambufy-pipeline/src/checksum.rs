//! Content fingerprint embedded in the rewritten header.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use md5::{Digest, Md5};

use bambufy_core::dialect;
use bambufy_core::error::Result;

use crate::summary::Summary;

/// MD5 over the synthesized header line, the original file bytes, and the
/// metadata block, in that order.
///
/// A stale `; MD5` comment on the very first line is skipped so a digest
/// that survived a previous run never feeds the new one. The digest is
/// informational provenance; nothing verifies it on read-back.
pub fn content_checksum(path: &Path, summary: &Summary) -> Result<String> {
    let mut hasher = Md5::new();
    hasher.update(b"; ");
    hasher.update(summary.header.as_bytes());
    hasher.update(b"\n");

    let mut reader = BufReader::new(File::open(path)?);
    let mut first_line = Vec::new();
    reader.read_until(b'\n', &mut first_line)?;
    if !dialect::is_stale_checksum(&first_line) {
        hasher.update(&first_line);
    }
    let mut chunk = [0u8; 8192];
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }

    hasher.update(summary.metadata_block.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
