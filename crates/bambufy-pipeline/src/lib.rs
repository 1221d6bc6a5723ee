//! # Bambufy Pipeline
//!
//! The metadata-extraction-and-rewrite pipeline for slicer-emitted G-code:
//!
//! - **Scanner**: one forward pass that detects the slicer dialect, extracts
//!   metadata fields, captures the first printed layer, and short-circuits on
//!   files that already carry a summary header
//! - **Exclude**: first-layer bounding box and exclusion-zone declaration
//! - **Summary**: finalization of the `_IFS_COLORS` header line and the
//!   BambuStudio metadata block
//! - **Checksum**: MD5 content fingerprint embedded in the header
//! - **Rewrite**: atomic in-place rewrite via a same-directory temp file
//! - **Notifier**: best-effort side channel to the running printer process

pub mod checksum;
pub mod exclude;
pub mod notifier;
pub mod process;
pub mod rewrite;
pub mod scanner;
pub mod summary;

pub use checksum::content_checksum;
pub use exclude::{first_layer_bounds, BoundingBox};
pub use notifier::{append_to, launched_from_slicer, notify_printer, PRINTER_PATH};
pub use process::{process_file, ProcessOutcome};
pub use rewrite::rewrite_with_header;
pub use scanner::{scan_lines, scan_path, BambuFields, CaptureWindow, Metadata, ScanOutcome};
pub use summary::{build_summary, Summary};
