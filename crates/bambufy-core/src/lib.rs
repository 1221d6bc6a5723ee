//! # Bambufy Core
//!
//! Core types and parsing utilities for the Bambufy pre-print processor.
//! Provides slicer dialect detection, the stateless metadata field parsers,
//! feedrate unit conversion, and the shared error type.

pub mod dialect;
pub mod error;
pub mod fields;
pub mod units;

pub use dialect::{bambu_field, BambuField, SlicerFamily, DEFAULT_VERSION, HEADER_PROBE_LINES};
pub use error::{PreprintError, Result};
pub use fields::{
    parse_colour_list, parse_feedrate_list, parse_tool_index, parse_type_list, parse_version,
};
pub use units::volumetric_to_linear;
