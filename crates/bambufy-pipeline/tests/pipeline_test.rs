use std::fs;
use std::path::PathBuf;

use bambufy_pipeline::{process_file, ProcessOutcome};
use tempfile::TempDir;

const ORCA_SAMPLE: &str = "\
; generated by OrcaSlicer 2.0.0\n\
; filament_colour = #AABBCC;#112233\n\
; filament_type = PLA;PETG\n\
; filament_max_volumetric_speed = 100,200\n\
T0\n\
;AFTER_LAYER_CHANGE\n\
G1 X0 Y0 E1\n\
G1 X10 Y5 E1\n\
G1 X50 Y50 E0\n\
;AFTER_LAYER_CHANGE\n\
G1 X99 Y99 E1\n";

const BAMBU_SAMPLE: &str = "\
; BambuStudio 01.09.00.70\n\
; filament_colour = #FF0000\n\
; filament_type = PLA\n\
; filament_max_volumetric_speed = 12\n\
; nozzle_temperature = 220,240\n\
; hot_plate_temp = 55,55\n\
; layer_height = 0.2\n\
; total filament weight [g] : 12.0,7.0\n\
T0\n\
;AFTER_LAYER_CHANGE\n\
G1 X1 Y1 E0.5\n\
;AFTER_LAYER_CHANGE\n";

fn write_gcode(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_end_to_end_orca() {
    let dir = TempDir::new().unwrap();
    let path = write_gcode(&dir, "part.gcode", ORCA_SAMPLE);

    let outcome = process_file(&path).unwrap();
    let summary = match outcome {
        ProcessOutcome::Rewritten { summary, .. } => summary,
        other => panic!("expected a rewrite, got {:?}", other),
    };

    assert_eq!(
        summary.header,
        "_IFS_COLORS START=1 TYPES=PLA,PETG E_FEEDRATES=4500,9000 COLORS=AABBCC,112233 \
         TOOLS=0 VERSION=1.2.2 EXCLUDE=\"EXCLUDE_OBJECT_DEFINE NAME=First_Layer \
         CENTER=5.0000,2.5000 POLYGON=[[0.000000,0.000000],[10.000000,0.000000],\
         [10.000000,5.000000],[0.000000,5.000000]]\""
    );
    assert_eq!(summary.metadata_block, "");

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    let checksum_line = lines.next().unwrap();
    assert!(checksum_line.starts_with("; MD5:"));
    assert_eq!(checksum_line.len(), "; MD5:".len() + 32);
    assert_eq!(lines.next().unwrap(), format!("; {}", summary.header));
    let rest: String = content.splitn(3, '\n').nth(2).unwrap().to_string();
    assert_eq!(rest, ORCA_SAMPLE);
}

#[test]
fn test_second_run_short_circuits_without_modification() {
    let dir = TempDir::new().unwrap();
    let path = write_gcode(&dir, "part.gcode", ORCA_SAMPLE);

    process_file(&path).unwrap();
    let after_first = fs::read(&path).unwrap();

    let outcome = process_file(&path).unwrap();
    match outcome {
        ProcessOutcome::AlreadyProcessed { payload } => {
            assert!(payload.starts_with("_IFS_COLORS START=1"));
        }
        other => panic!("expected a short-circuit, got {:?}", other),
    }
    assert_eq!(fs::read(&path).unwrap(), after_first);
}

#[test]
fn test_bambu_metadata_block_is_appended() {
    let dir = TempDir::new().unwrap();
    let path = write_gcode(&dir, "part.gcode", BAMBU_SAMPLE);

    let outcome = process_file(&path).unwrap();
    let summary = match outcome {
        ProcessOutcome::Rewritten { summary, .. } => summary,
        other => panic!("expected a rewrite, got {:?}", other),
    };

    assert!(summary.header.contains("E_FEEDRATES=540 "));
    assert!(summary.header.contains("COLORS=FF0000 "));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.ends_with(&summary.metadata_block));
    assert!(summary.metadata_block.contains("; filament used [g] = 12.0,7.0"));
    assert!(summary.metadata_block.contains("; total filament used [g] = 19.0"));
    assert!(summary.metadata_block.contains("; layer_height = 0.2\n"));
    assert!(summary.metadata_block.contains("; first_layer_bed_temperature = 55\n"));
    assert!(summary.metadata_block.contains("; first_layer_temperature = 220\n"));
}

#[test]
fn test_no_extrusion_leaves_exclude_empty() {
    let dir = TempDir::new().unwrap();
    let sample = "\
; generated by OrcaSlicer 2.0.0\n\
; filament_type = PLA\n\
;AFTER_LAYER_CHANGE\n\
G1 X10 Y10\n\
;AFTER_LAYER_CHANGE\n";
    let path = write_gcode(&dir, "travel.gcode", sample);

    let outcome = process_file(&path).unwrap();
    match outcome {
        ProcessOutcome::Rewritten { summary, .. } => {
            assert!(summary.header.ends_with("EXCLUDE=\"\""));
        }
        other => panic!("expected a rewrite, got {:?}", other),
    }
}

#[test]
fn test_malformed_feedrate_aborts_and_leaves_file_alone() {
    let dir = TempDir::new().unwrap();
    let sample = "; generated by OrcaSlicer 2.0.0\n; filament_max_volumetric_speed = fast\nG28\n";
    let path = write_gcode(&dir, "bad.gcode", sample);

    assert!(process_file(&path).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), sample);
    // No half-written temp file may survive the failure.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    assert!(process_file(&dir.path().join("absent.gcode")).is_err());
}

#[test]
fn test_rewritten_checksum_reflects_content() {
    let dir = TempDir::new().unwrap();
    let path_a = write_gcode(&dir, "a.gcode", ORCA_SAMPLE);
    let path_b = write_gcode(&dir, "b.gcode", ORCA_SAMPLE);

    let checksum_of = |outcome: ProcessOutcome| match outcome {
        ProcessOutcome::Rewritten { checksum, .. } => checksum,
        other => panic!("expected a rewrite, got {:?}", other),
    };

    let a = checksum_of(process_file(&path_a).unwrap());
    let b = checksum_of(process_file(&path_b).unwrap());
    // Identical content and summary produce the identical digest.
    assert_eq!(a, b);
}
