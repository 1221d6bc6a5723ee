//! Summary finalization.
//!
//! Turns one pass worth of accumulated metadata into the `_IFS_COLORS`
//! header line the printer consumes, plus the extra BambuStudio metadata
//! block for files from that slicer.

use serde::{Deserialize, Serialize};

use bambufy_core::dialect::{SlicerFamily, DEFAULT_VERSION};
use bambufy_core::error::{PreprintError, Result};
use bambufy_core::units;

use crate::scanner::{BambuFields, Metadata};

/// Finalized, immutable header derived from one scanning pass.
///
/// Consumed by the checksum computer, the rewriter, and the notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// The `_IFS_COLORS ...` line, no comment decoration, no trailing
    /// newline.
    pub header: String,
    /// BambuStudio extra metadata block; empty for every other slicer.
    pub metadata_block: String,
}

/// Build the summary from accumulated metadata and the optional exclusion
/// declaration.
///
/// Key order in the header line is fixed; the printer parses it
/// positionally.
pub fn build_summary(meta: &Metadata, exclude: Option<&str>) -> Result<Summary> {
    let types = meta.types.as_deref().unwrap_or_default().join(",");
    let feedrates = convert_feedrates(meta.feedrates.as_deref().unwrap_or_default())?;
    let colors = meta
        .colors
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| strip_colour_marker(c))
        .collect::<Vec<_>>()
        .join(",");
    let tools = meta
        .tools
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let version = meta.version.as_deref().unwrap_or(DEFAULT_VERSION);

    let header = format!(
        "_IFS_COLORS START=1 TYPES={} E_FEEDRATES={} COLORS={} TOOLS={} VERSION={} EXCLUDE=\"{}\"",
        types,
        feedrates,
        colors,
        tools,
        version,
        exclude.unwrap_or(""),
    );

    let metadata_block = match meta.family {
        SlicerFamily::Bambu => bambu_metadata_block(&meta.bambu),
        _ => String::new(),
    };

    Ok(Summary {
        header,
        metadata_block,
    })
}

fn convert_feedrates(raw: &[String]) -> Result<String> {
    let mut converted = Vec::with_capacity(raw.len());
    for value in raw {
        let v = value.parse::<f64>().map_err(|_| PreprintError::InvalidNumber {
            token: value.clone(),
            context: "filament_max_volumetric_speed".to_string(),
        })?;
        converted.push(units::volumetric_to_linear(v).to_string());
    }
    Ok(converted.join(","))
}

/// Colour tokens arrive as `#RRGGBB`; the header carries the bare hex value.
fn strip_colour_marker(colour: &str) -> &str {
    let mut chars = colour.chars();
    chars.next();
    chars.as_str()
}

/// Assemble the BambuStudio metadata block.
///
/// Verbatim fields carry their own newline from capture; unset fields are
/// empty strings and simply thin the block out.
fn bambu_metadata_block(fields: &BambuFields) -> String {
    format!(
        "\n{}\n{}\n{}\n{}{}{}{}{}{}; first_layer_bed_temperature = {}\n; first_layer_temperature = {}\n",
        fields.filament_used_mm,
        fields.filament_used_g,
        fields.total_filament_used_g,
        fields.estimated_printing_time,
        fields.filament_type,
        fields.filament_settings_id,
        fields.layer_height,
        fields.nozzle_diameter,
        fields.filament_colour,
        fields.hot_plate_temp,
        fields.nozzle_temperature,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bambufy_core::dialect::SlicerFamily;

    fn base_metadata() -> Metadata {
        Metadata {
            colors: Some(vec!["#AABBCC".to_string(), "#112233".to_string()]),
            types: Some(vec!["PLA".to_string(), "PETG".to_string()]),
            feedrates: Some(vec!["100".to_string(), "200".to_string()]),
            ..Metadata::default()
        }
    }

    #[test]
    fn test_header_layout_and_conversions() {
        let mut meta = base_metadata();
        meta.tools.extend([2, 0, 1]);
        meta.version = Some("2.1.0".to_string());
        let summary = build_summary(&meta, Some("EXCLUDE_OBJECT_DEFINE NAME=First_Layer"))
            .unwrap();
        assert_eq!(
            summary.header,
            "_IFS_COLORS START=1 TYPES=PLA,PETG E_FEEDRATES=4500,9000 COLORS=AABBCC,112233 \
             TOOLS=0,1,2 VERSION=2.1.0 EXCLUDE=\"EXCLUDE_OBJECT_DEFINE NAME=First_Layer\""
        );
    }

    #[test]
    fn test_version_falls_back() {
        let summary = build_summary(&base_metadata(), None).unwrap();
        assert!(summary.header.contains("VERSION=1.2.2"));
    }

    #[test]
    fn test_missing_box_leaves_exclude_empty() {
        let summary = build_summary(&base_metadata(), None).unwrap();
        assert!(summary.header.ends_with("EXCLUDE=\"\""));
    }

    #[test]
    fn test_absent_fields_render_empty() {
        let summary = build_summary(&Metadata::default(), None).unwrap();
        assert!(summary.header.contains("TYPES= "));
        assert!(summary.header.contains("COLORS= "));
        assert!(summary.header.contains("TOOLS= "));
    }

    #[test]
    fn test_malformed_feedrate_is_fatal() {
        let mut meta = base_metadata();
        meta.feedrates = Some(vec!["fast".to_string()]);
        assert!(build_summary(&meta, None).is_err());
    }

    #[test]
    fn test_metadata_block_only_for_bambu() {
        let mut meta = base_metadata();
        meta.family = SlicerFamily::Orca;
        assert_eq!(build_summary(&meta, None).unwrap().metadata_block, "");

        meta.family = SlicerFamily::Bambu;
        let summary = build_summary(&meta, None).unwrap();
        assert!(!summary.metadata_block.is_empty());
    }

    #[test]
    fn test_metadata_block_assembly() {
        let mut meta = base_metadata();
        meta.family = SlicerFamily::Bambu;
        meta.bambu.nozzle_temperature = "220".to_string();
        meta.bambu.hot_plate_temp = "55".to_string();
        meta.bambu.layer_height = "; layer_height = 0.2\n".to_string();
        meta.bambu.filament_used_mm = "; filament used [mm] = 1575.93".to_string();

        let block = build_summary(&meta, None).unwrap().metadata_block;
        assert!(block.starts_with("\n; filament used [mm] = 1575.93\n"));
        assert!(block.contains("; layer_height = 0.2\n"));
        assert!(block.ends_with(
            "; first_layer_bed_temperature = 55\n; first_layer_temperature = 220\n"
        ));
    }
}
