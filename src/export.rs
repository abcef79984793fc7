//! Export functionality for decoded messages
//!
//! Writes the positions of a [`MessageFile`] as CSV (one row per message,
//! one column per attribute key) or as JSON.

use crate::types::*;
use anyhow::Context;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Export options for controlling output formats
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub csv: bool,
    pub json: bool,
    pub output_dir: Option<String>,
}

/// Paths written by an export run
#[derive(Debug, Default)]
pub struct ExportReport {
    pub csv_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// Output path for `input_path` with the given extension.
///
/// Lands next to the input unless an output directory is configured.
pub fn compute_export_path(input_path: &Path, extension: &str, options: &ExportOptions) -> PathBuf {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("messages");
    let dir = match &options.output_dir {
        Some(dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    dir.join(format!("{}.{}", stem, extension))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    Ok(())
}

/// Fixed leading columns of the CSV export
pub const CSV_FIXED_COLUMNS: [&str; 8] = [
    "line",
    "form",
    "altitude",
    "mcc",
    "mnc",
    "lac",
    "cellId",
    "signalStrength",
];

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Export decoded messages to CSV
#[cfg(feature = "csv")]
pub fn export_to_csv(file: &MessageFile, input_path: &Path, options: &ExportOptions) -> anyhow::Result<PathBuf> {
    let output_path = compute_export_path(input_path, "csv", options);
    ensure_parent(&output_path)?;

    let keys: BTreeSet<&str> = file
        .positions()
        .flat_map(|p| p.attributes.keys().map(String::as_str))
        .collect();

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("Failed to create CSV file {:?}", output_path))?;

    let header: Vec<&str> = CSV_FIXED_COLUMNS.iter().copied().chain(keys.iter().copied()).collect();
    writer.write_record(&header)?;

    for message in &file.messages {
        let position = &message.position;
        let cell = position.network.as_ref().and_then(|n| n.primary_cell());
        let mut record = vec![
            message.line_number.to_string(),
            message.form.clone(),
            opt(position.altitude),
            opt(cell.and_then(|c| c.mobile_country_code)),
            opt(cell.and_then(|c| c.mobile_network_code)),
            opt(cell.and_then(|c| c.location_area_code)),
            opt(cell.and_then(|c| c.cell_id)),
            opt(cell.and_then(|c| c.signal_strength)),
        ];
        record.extend(keys.iter().map(|key| opt(position.get(key))));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    log::debug!("Wrote {} row(s) to {:?}", file.message_count(), output_path);
    Ok(output_path)
}

/// Export decoded messages to JSON
#[cfg(feature = "json")]
pub fn export_to_json(file: &MessageFile, input_path: &Path, options: &ExportOptions) -> anyhow::Result<PathBuf> {
    let output_path = compute_export_path(input_path, "json", options);
    ensure_parent(&output_path)?;

    let json = serde_json::to_string_pretty(file).context("Failed to serialize messages")?;
    std::fs::write(&output_path, json)
        .with_context(|| format!("Failed to write JSON file {:?}", output_path))?;
    Ok(output_path)
}

/// Run every export enabled in `options`
pub fn export_message_file(
    file: &MessageFile,
    input_path: &Path,
    options: &ExportOptions,
) -> anyhow::Result<ExportReport> {
    let mut report = ExportReport::default();

    if options.csv {
        #[cfg(feature = "csv")]
        {
            report.csv_path = Some(export_to_csv(file, input_path, options)?);
        }
        #[cfg(not(feature = "csv"))]
        log::warn!("CSV export requested but the csv feature is disabled");
    }

    if options.json {
        #[cfg(feature = "json")]
        {
            report.json_path = Some(export_to_json(file, input_path, options)?);
        }
        #[cfg(not(feature = "json"))]
        log::warn!("JSON export requested but the json feature is disabled");
    }

    Ok(report)
}
