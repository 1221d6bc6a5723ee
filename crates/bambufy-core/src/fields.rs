//! Stateless field parsers for slicer metadata comment lines.
//!
//! Each parser recognizes one dialect fragment on a single line and returns
//! `None` when the line is not its fragment. The stream scanner consults them
//! per line and keeps the first hit for each field.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{PreprintError, Result};

/// Split the value part of a `key = value` comment into trimmed items.
///
/// Empty items are dropped, so trailing separators are harmless.
fn split_value_list(line: &str, separator: char) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"=\s*(.+)$").expect("invalid regex pattern"));
    match re.captures(line) {
        Some(caps) => caps[1]
            .split(separator)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// Parse a `; filament_colour = #AABBCC;#112233` comment.
///
/// Returns the raw colour tokens, leading marker character included; the
/// summary builder strips it at the output boundary.
pub fn parse_colour_list(line: &str) -> Option<Vec<String>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r";\s*filament_colour\s*=").expect("invalid regex pattern")
    });
    re.is_match(line).then(|| split_value_list(line, ';'))
}

/// Parse a `; filament_type = PLA;PETG` comment.
pub fn parse_type_list(line: &str) -> Option<Vec<String>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r";\s*filament_type\s*=").expect("invalid regex pattern")
    });
    re.is_match(line).then(|| split_value_list(line, ';'))
}

/// Parse a `; filament_max_volumetric_speed = 12,16` comment.
///
/// Values are kept as raw strings in slicer units (mm³/s); conversion to a
/// linear feedrate happens at summary time.
pub fn parse_feedrate_list(line: &str) -> Option<Vec<String>> {
    if !line.contains("; filament_max_volumetric_speed =") {
        return None;
    }
    Some(split_value_list(line, ','))
}

/// Parse the `; Bambufy: v1.2.2` version tag.
pub fn parse_version(line: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r";\s*Bambufy:\s*v*([\d.]+)").expect("invalid regex pattern")
    });
    re.captures(line).map(|caps| caps[1].to_string())
}

/// Parse a tool-select command (`T0`, ` T12`) at the start of a line.
///
/// Returns `Ok(None)` for non-tool lines. An index too large for `u32` is a
/// malformed numeric field and fails the run.
pub fn parse_tool_index(line: &str) -> Result<Option<u32>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\s*T(\d+)").expect("invalid regex pattern"));
    match re.captures(line) {
        Some(caps) => {
            let digits = &caps[1];
            let index = digits.parse::<u32>().map_err(|_| PreprintError::InvalidNumber {
                token: digits.to_string(),
                context: "tool-select command".to_string(),
            })?;
            Ok(Some(index))
        }
        None => Ok(None),
    }
}
