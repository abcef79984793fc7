//! CLI binary for the ATrack custom-field decoder
//!
//! Decodes message files (one `<form> <payload>` per line), prints the
//! decoded attributes and optionally exports them.

use anyhow::Result;
use atrack_parser::{
    export_message_file, parse_message_file, DecodeOptions, Encoding, ExportOptions, MessageFile,
};
use clap::{Arg, Command};
use glob::glob;
use std::path::{Path, PathBuf};

fn long_version() -> String {
    format!(
        "{} (git {}{})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        match option_env!("VERGEN_GIT_DIRTY") {
            Some("true") => "-dirty",
            _ => "",
        }
    )
}

fn build_command() -> Command {
    Command::new("ATrack Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version())
        .about("Decode ATrack custom-field segments from message files. Output to various formats.")
        .arg(
            Arg::new("files")
                .help("Message files to decode, one '<form> <payload>' per line (supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("binary")
                .long("binary")
                .help("Payloads are hex-encoded binary segments instead of text")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Reject binary tags with no known layout instead of skipping them")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed decoding information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export decoded positions to CSV files (<name>.csv)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Export decoded positions to JSON files (<name>.json, needs the json feature)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for exported files (default: same as input file)")
                .value_name("DIR"),
        )
}

fn expand_patterns(patterns: &[&String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                    Ok(matched) => {
                        log::debug!("Glob pattern '{pattern}' matched {} files", matched.len());
                        paths.extend(matched);
                    }
                    Err(e) => eprintln!("Error expanding glob pattern '{pattern}': {e}"),
                },
                Err(e) => eprintln!("Invalid glob pattern '{pattern}': {e}"),
            }
        } else {
            paths.push(Path::new(pattern.as_str()).to_path_buf());
        }
    }
    paths
}

fn print_messages(file: &MessageFile) {
    for message in &file.messages {
        println!("  line {} {}", message.line_number, message.form);
        let position = &message.position;
        if let Some(altitude) = position.altitude {
            println!("    altitude = {altitude}");
        }
        if let Some(cell) = position.network.as_ref().and_then(|n| n.primary_cell()) {
            println!(
                "    cell = mcc {:?} mnc {:?} lac {:?} id {:?} signal {:?}",
                cell.mobile_country_code,
                cell.mobile_network_code,
                cell.location_area_code,
                cell.cell_id,
                cell.signal_strength
            );
        }
        for (key, value) in &position.attributes {
            println!("    {key} = {value}");
        }
    }
    for failure in &file.failures {
        eprintln!("  line {} failed: {}", failure.line_number, failure.error);
    }
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if debug {
        "debug"
    } else {
        "warn"
    }))
    .init();

    let encoding = if matches.get_flag("binary") {
        Encoding::Binary
    } else {
        Encoding::Text
    };
    let decode_options = DecodeOptions {
        strict_binary_tags: matches.get_flag("strict"),
    };
    let export_options = ExportOptions {
        csv: matches.get_flag("csv"),
        json: matches.get_flag("json"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };
    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|files| files.collect())
        .unwrap_or_default();

    log::debug!("Input patterns: {file_patterns:?}");

    let valid_paths: Vec<PathBuf> = expand_patterns(&file_patterns)
        .into_iter()
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                eprintln!("Warning: File does not exist: {path:?}");
            }
            exists
        })
        .collect();

    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut processed_files = 0;
    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        let file = match parse_message_file(path, encoding, &decode_options) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Error processing {filename}: {e:#}");
                eprintln!("Continuing with next file...");
                continue;
            }
        };

        print_messages(&file);
        println!(
            "Decoded {} message(s), {} failed",
            file.message_count(),
            file.failures.len()
        );

        match export_message_file(&file, path, &export_options) {
            Ok(report) => {
                for written in report.csv_path.iter().chain(report.json_path.iter()) {
                    println!("Exported: {}", written.display());
                }
            }
            Err(e) => eprintln!("Export failed for {filename}: {e:#}"),
        }
        processed_files += 1;
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}
