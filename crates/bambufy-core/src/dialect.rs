//! Slicer dialect detection and comment patterns.
//!
//! Two comment dialects are recognized: BambuStudio and OrcaSlicer. Both
//! emit `; key = value` metadata comments with overlapping keys; BambuStudio
//! additionally emits the per-print fields listed in [`BAMBU_FIELD_PREFIXES`].
//! The patterns here are the single source of truth for what the stream
//! scanner recognizes.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of header lines probed for slicer signatures and the
/// already-processed marker.
pub const HEADER_PROBE_LINES: usize = 10;

/// Version emitted in the summary when no `; Bambufy:` tag is present.
pub const DEFAULT_VERSION: &str = "1.2.2";

/// Slicer family detected from signature comments.
///
/// Set at most once per pass, from the first [`HEADER_PROBE_LINES`] lines;
/// immutable afterward. Selects which dialect-specific parsers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlicerFamily {
    /// No signature seen.
    Unknown,
    /// BambuStudio and derivatives.
    Bambu,
    /// OrcaSlicer.
    Orca,
}

impl Default for SlicerFamily {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for SlicerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Bambu => write!(f, "bambu"),
            Self::Orca => write!(f, "orca"),
        }
    }
}

impl SlicerFamily {
    /// Detect a slicer signature in a header comment line.
    ///
    /// BambuStudio takes precedence when both signatures appear on one line.
    pub fn detect(line: &str) -> Option<SlicerFamily> {
        static BAMBU_RE: OnceLock<Regex> = OnceLock::new();
        static ORCA_RE: OnceLock<Regex> = OnceLock::new();
        let bambu = BAMBU_RE.get_or_init(|| {
            Regex::new(r";.*BambuStudio").expect("invalid regex pattern")
        });
        let orca = ORCA_RE.get_or_init(|| {
            Regex::new(r";.*OrcaSlicer").expect("invalid regex pattern")
        });

        if bambu.is_match(line) {
            Some(Self::Bambu)
        } else if orca.is_match(line) {
            Some(Self::Orca)
        } else {
            None
        }
    }

    /// Whether a signature has been detected.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Check for the layer-change marker comment.
///
/// The first occurrence opens the first-layer capture window, the second
/// closes it.
pub fn is_layer_change(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^;\s*AFTER_LAYER_CHANGE").expect("invalid regex pattern")
    });
    re.is_match(line)
}

/// Extract the payload of an already-processed marker line.
///
/// A previous run leaves its summary as an `; _IFS_COLORS ...` comment at the
/// top of the file. Returns the line with the comment decoration stripped,
/// or `None` when the line is not a marker.
pub fn processed_payload(line: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^;\s*_IFS_COLORS.*$").expect("invalid regex pattern")
    });
    re.find(line)
        .map(|m| m.as_str().trim_start_matches([';', ' ']).trim_end().to_string())
}

/// Check the raw first line of a file for a leftover checksum comment.
///
/// Binary-safe: the second checksum pass streams raw bytes and must not
/// re-hash a stale digest that survived a previous run.
pub fn is_stale_checksum(line: &[u8]) -> bool {
    static RE: OnceLock<regex::bytes::Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        regex::bytes::Regex::new(r"(?i);\s*MD5\s*[:=]").expect("invalid regex pattern")
    });
    re.is_match(line)
}

/// Per-print metadata fields recognized in BambuStudio comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BambuField {
    /// `; nozzle_temperature = ...` (first tool's value).
    NozzleTemperature,
    /// `; hot_plate_temp = ...` (first tool's value).
    HotPlateTemp,
    /// `; filament_colour = ...` kept verbatim.
    FilamentColour,
    /// `; nozzle_diameter = ...` kept verbatim.
    NozzleDiameter,
    /// `; filament_type = ...` kept verbatim.
    FilamentType,
    /// `; layer_height = ...` kept verbatim.
    LayerHeight,
    /// `; estimated printing time ...` kept verbatim.
    EstimatedPrintingTime,
    /// `; filament_settings_id = ...` kept verbatim.
    FilamentSettingsId,
    /// `; total filament length ...` rewritten as a `filament used [mm]` line.
    TotalFilamentLength,
    /// `; total filament weight ...` rewritten as `filament used [g]` plus a
    /// summed `total filament used [g]` line.
    TotalFilamentWeight,
}

/// Ordered prefix table for BambuStudio metadata comments.
///
/// Kept as data rather than branching code so a third dialect can ship its
/// own table.
pub const BAMBU_FIELD_PREFIXES: &[(&str, BambuField)] = &[
    ("; nozzle_temperature =", BambuField::NozzleTemperature),
    ("; hot_plate_temp =", BambuField::HotPlateTemp),
    ("; filament_colour =", BambuField::FilamentColour),
    ("; nozzle_diameter =", BambuField::NozzleDiameter),
    ("; filament_type =", BambuField::FilamentType),
    ("; layer_height =", BambuField::LayerHeight),
    ("; estimated printing time", BambuField::EstimatedPrintingTime),
    ("; filament_settings_id = ", BambuField::FilamentSettingsId),
    ("; total filament length", BambuField::TotalFilamentLength),
    ("; total filament weight", BambuField::TotalFilamentWeight),
];

/// Look up which Bambu metadata field a comment line carries.
pub fn bambu_field(line: &str) -> Option<BambuField> {
    BAMBU_FIELD_PREFIXES
        .iter()
        .find(|(prefix, _)| line.starts_with(prefix))
        .map(|&(_, field)| field)
}
