//! Single-pass line scanner over a slicer-emitted G-code file.
//!
//! One forward pass drives everything: already-processed detection, slicer
//! identification, first-match metadata fields, the first-layer capture
//! window, tool accumulation, and BambuStudio key/value capture. Lines are
//! never retained beyond the pass except those inside the capture window.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bambufy_core::dialect::{self, BambuField, SlicerFamily, HEADER_PROBE_LINES};
use bambufy_core::error::{PreprintError, Result};
use bambufy_core::fields;

/// First-layer capture window.
///
/// The lines between two `AFTER_LAYER_CHANGE` markers are the first printed
/// layer. The opening marker is not captured; the closing marker is. The
/// window captures once and never re-arms.
#[derive(Debug, Default)]
pub struct CaptureWindow {
    state: CaptureState,
    lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CaptureState {
    #[default]
    Waiting,
    Capturing,
    Closed,
}

impl CaptureWindow {
    /// Feed one line through the window state machine.
    pub fn observe(&mut self, line: &str) {
        match self.state {
            CaptureState::Waiting => {
                if dialect::is_layer_change(line) {
                    self.state = CaptureState::Capturing;
                }
            }
            CaptureState::Capturing => {
                // The closing marker line belongs to the window.
                if dialect::is_layer_change(line) {
                    self.state = CaptureState::Closed;
                }
                self.lines.push(line.to_string());
            }
            CaptureState::Closed => {}
        }
    }

    /// The captured first-layer lines, in stream order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether the second marker has been seen.
    pub fn is_closed(&self) -> bool {
        self.state == CaptureState::Closed
    }
}

/// Named string fields captured from BambuStudio metadata comments.
///
/// Every field defaults to the empty string, so a file that never emits a
/// given key still formats a (sparser) metadata block instead of failing.
/// Later occurrences of a key overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct BambuFields {
    /// First nozzle temperature value, bare token.
    pub nozzle_temperature: String,
    /// First bed temperature value, bare token.
    pub hot_plate_temp: String,
    /// Verbatim `; filament_colour = ...` line, newline-terminated.
    pub filament_colour: String,
    /// Verbatim `; nozzle_diameter = ...` line, newline-terminated.
    pub nozzle_diameter: String,
    /// Verbatim `; filament_type = ...` line, newline-terminated.
    pub filament_type: String,
    /// Verbatim `; layer_height = ...` line, newline-terminated.
    pub layer_height: String,
    /// Verbatim `; estimated printing time ...` line, newline-terminated.
    pub estimated_printing_time: String,
    /// Verbatim `; filament_settings_id = ...` line, newline-terminated.
    pub filament_settings_id: String,
    /// Derived `; filament used [mm] = ...` line, no trailing newline.
    pub filament_used_mm: String,
    /// Derived `; filament used [g] = ...` line, no trailing newline.
    pub filament_used_g: String,
    /// Derived `; total filament used [g] = ...` line, no trailing newline.
    pub total_filament_used_g: String,
}

impl BambuFields {
    /// Store the value a metadata comment carries.
    ///
    /// `line` arrives without its trailing newline. Fails when the filament
    /// weight total contains a malformed float.
    fn capture(&mut self, field: BambuField, line: &str) -> Result<()> {
        match field {
            BambuField::NozzleTemperature => self.nozzle_temperature = first_value_token(line),
            BambuField::HotPlateTemp => self.hot_plate_temp = first_value_token(line),
            BambuField::FilamentColour => self.filament_colour = verbatim(line),
            BambuField::NozzleDiameter => self.nozzle_diameter = verbatim(line),
            BambuField::FilamentType => self.filament_type = verbatim(line),
            BambuField::LayerHeight => self.layer_height = verbatim(line),
            BambuField::EstimatedPrintingTime => self.estimated_printing_time = verbatim(line),
            BambuField::FilamentSettingsId => self.filament_settings_id = verbatim(line),
            BambuField::TotalFilamentLength => {
                self.filament_used_mm =
                    format!("; filament used [mm] = {}", text_after_colon(line));
            }
            BambuField::TotalFilamentWeight => {
                let weights = text_after_colon(line);
                self.filament_used_g = format!("; filament used [g] = {}", weights);
                let mut total = 0.0_f64;
                for part in weights.split(',') {
                    let token = part.trim();
                    total += token.parse::<f64>().map_err(|_| PreprintError::InvalidNumber {
                        token: token.to_string(),
                        context: "total filament weight".to_string(),
                    })?;
                }
                // {:?} keeps the trailing .0 the slicer puts on whole-number weights.
                self.total_filament_used_g =
                    format!("; total filament used [g] = {:?}", total);
            }
        }
        Ok(())
    }
}

fn verbatim(line: &str) -> String {
    let mut owned = String::with_capacity(line.len() + 1);
    owned.push_str(line);
    owned.push('\n');
    owned
}

fn first_value_token(line: &str) -> String {
    line.splitn(2, '=')
        .nth(1)
        .unwrap_or("")
        .trim()
        .split(',')
        .next()
        .unwrap_or("")
        .to_string()
}

fn text_after_colon(line: &str) -> String {
    line.splitn(2, ':').nth(1).unwrap_or("").trim().to_string()
}

/// Everything one scanning pass accumulates.
///
/// Created fresh per invocation, mutated only by the scanner, consumed by the
/// summary builder. Colors, types, and feedrates populate at most once; the
/// first matching line wins.
#[derive(Debug, Default)]
pub struct Metadata {
    /// Detected slicer family; permanent once set.
    pub family: SlicerFamily,
    /// Raw colour tokens, marker character included.
    pub colors: Option<Vec<String>>,
    /// Filament type names.
    pub types: Option<Vec<String>>,
    /// Raw volumetric feedrate values.
    pub feedrates: Option<Vec<String>>,
    /// Version from the `; Bambufy:` tag.
    pub version: Option<String>,
    /// Tool indices seen anywhere in the stream, naturally sorted.
    pub tools: BTreeSet<u32>,
    /// First printed layer.
    pub first_layer: CaptureWindow,
    /// BambuStudio per-print fields.
    pub bambu: BambuFields,
}

/// Result of one scanning pass.
#[derive(Debug)]
pub enum ScanOutcome {
    /// The file already carries a summary header from a previous run.
    ///
    /// The payload is the header line with its comment decoration stripped;
    /// nothing else was extracted and the file must not be rewritten.
    AlreadyProcessed(String),
    /// Fresh file; accumulated metadata is ready for finalization.
    Scanned(Metadata),
}

/// Scan a G-code file in one forward pass.
pub fn scan_path(path: &Path) -> Result<ScanOutcome> {
    let file = File::open(path)?;
    scan_lines(BufReader::new(file).lines())
}

/// Scan an ordered sequence of lines.
///
/// Separated from the file driver so tests can feed synthetic streams.
pub fn scan_lines<I>(lines: I) -> Result<ScanOutcome>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut meta = Metadata::default();

    for (index, line) in lines.enumerate() {
        let line = line?;

        if index < HEADER_PROBE_LINES {
            if let Some(payload) = dialect::processed_payload(&line) {
                tracing::info!("file already carries a summary header");
                return Ok(ScanOutcome::AlreadyProcessed(payload));
            }
            if !meta.family.is_known() {
                if let Some(family) = SlicerFamily::detect(&line) {
                    tracing::debug!(%family, "slicer signature detected");
                    meta.family = family;
                }
            }
        }

        if meta.colors.is_none() {
            if let Some(colors) = fields::parse_colour_list(&line) {
                meta.colors = Some(colors);
            }
        }
        if meta.feedrates.is_none() {
            if let Some(feedrates) = fields::parse_feedrate_list(&line) {
                meta.feedrates = Some(feedrates);
            }
        }
        if meta.types.is_none() {
            if let Some(types) = fields::parse_type_list(&line) {
                meta.types = Some(types);
            }
        }
        if meta.version.is_none() {
            meta.version = fields::parse_version(&line);
        }

        meta.first_layer.observe(&line);

        if let Some(tool) = fields::parse_tool_index(&line)? {
            meta.tools.insert(tool);
        }

        if meta.family == SlicerFamily::Bambu && line.starts_with(';') {
            if let Some(field) = dialect::bambu_field(&line) {
                meta.bambu.capture(field, &line)?;
            }
        }
    }

    Ok(ScanOutcome::Scanned(meta))
}
