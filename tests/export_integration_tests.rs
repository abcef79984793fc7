//! Integration tests for export functionality
//!
//! Tests the export layer across different scenarios:
//! - CSV export with directory creation
//! - Attribute columns as the union of all messages
//! - Output directory defaulting to input parent
//! - Message files with failing lines

use atrack_parser::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = "\
# text messages
%SA%BV 9,121
%SA%RP%CE%LC%CN 5,2100,12345,10,31026
%SA broken
";

fn sample_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("trip.txt");
    fs::write(&path, SAMPLE).expect("Failed to write sample file");
    path
}

#[test]
fn test_parse_message_file_records_failures() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = sample_file(&temp_dir);

    let file = parse_message_file(&path, Encoding::Text, &DecodeOptions::default())
        .expect("file should parse");
    assert_eq!(file.filename, "trip.txt");
    assert_eq!(file.message_count(), 2);
    assert_eq!(file.failures.len(), 1);
    assert_eq!(file.failures[0].line_number, 4);
    assert!(file.has_network_data());
}

#[test]
fn test_parse_message_file_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("nope.txt");
    let err = parse_message_file(&missing, Encoding::Text, &DecodeOptions::default())
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read message file"));
}

#[test]
fn test_export_csv_creates_output_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = sample_file(&temp_dir);
    let out_dir = temp_dir.path().join("nested").join("out");

    let file = parse_message_file(&path, Encoding::Text, &DecodeOptions::default()).unwrap();
    let options = ExportOptions {
        csv: true,
        json: false,
        output_dir: Some(out_dir.to_str().unwrap().to_string()),
    };
    let report = export_message_file(&file, &path, &options).expect("export should succeed");

    let csv_path = report.csv_path.expect("CSV path expected");
    assert_eq!(csv_path, out_dir.join("trip.csv"));
    assert!(csv_path.exists(), "CSV file should be created");
    assert!(report.json_path.is_none());
}

#[test]
fn test_export_csv_columns_and_rows() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = sample_file(&temp_dir);

    let file = parse_message_file(&path, Encoding::Text, &DecodeOptions::default()).unwrap();
    let options = ExportOptions {
        csv: true,
        ..ExportOptions::default()
    };
    let csv_path = export_to_csv(&file, &path, &options).unwrap();
    assert_eq!(csv_path, temp_dir.path().join("trip.csv"));

    let content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one row per decoded message");
    assert_eq!(
        lines[0],
        "line,form,altitude,mcc,mnc,lac,cellId,signalStrength,battery,rpm,sat"
    );

    let header_fields = lines[0].split(',').count();
    for line in &lines[1..] {
        assert_eq!(line.split(',').count(), header_fields, "row: {line}");
    }
    assert!(lines[1].starts_with("2,%SA%BV,,,,,,,"));
    assert!(lines[2].starts_with("3,%SA%RP%CE%LC%CN,,310,26,10,12345,,"));
    assert!(lines[2].ends_with(",,2100,5"));
}

#[test]
fn test_export_nothing_selected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = sample_file(&temp_dir);
    let file = parse_message_file(&path, Encoding::Text, &DecodeOptions::default()).unwrap();

    let report = export_message_file(&file, &path, &ExportOptions::default()).unwrap();
    assert!(report.csv_path.is_none());
    assert!(report.json_path.is_none());
    assert!(!temp_dir.path().join("trip.csv").exists());
}

#[cfg(feature = "json")]
#[test]
fn test_export_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = sample_file(&temp_dir);
    let file = parse_message_file(&path, Encoding::Text, &DecodeOptions::default()).unwrap();

    let options = ExportOptions {
        json: true,
        ..ExportOptions::default()
    };
    let report = export_message_file(&file, &path, &options).unwrap();
    let json_path = report.json_path.expect("JSON path expected");
    let content = fs::read_to_string(json_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["messages"][0]["position"]["attributes"]["sat"], 9);
    assert_eq!(value["failures"][0]["line_number"], 4);
}
