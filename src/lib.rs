//! ATrack custom-field decoder
//!
//! A Rust library for decoding the custom-field segment that ATrack fleet
//! trackers append to each position report. The device announces the fields
//! it sends in a *form* header (`%SA%BV%CE...`); the values then follow
//! either as a comma separated text line or as packed big-endian binary.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export functionality
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable JSON export of decoded messages
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Decode a text payload:
//! ```rust
//! use atrack_parser::{read_text_custom_data, Position, KEY_SATELLITES};
//!
//! let mut position = Position::new();
//! read_text_custom_data(&mut position, "9,121", "%SA%BV").unwrap();
//! assert_eq!(position.get(KEY_SATELLITES).and_then(|v| v.as_i64()), Some(9));
//! ```
//!
//! Decode a binary payload:
//! ```rust
//! use atrack_parser::{read_binary_custom_data, ByteCursor, Position, KEY_RPM};
//!
//! let data = [0x07, 0x08, 0x3c];
//! let mut cursor = ByteCursor::new(&data);
//! let mut position = Position::new();
//! read_binary_custom_data(&mut position, &mut cursor, "%SA%RP").unwrap();
//! assert_eq!(position.get(KEY_RPM).and_then(|v| v.as_i64()), Some(2108));
//! ```
//!
//! # Public API
//!
//! ## Decoding Functions
//! - [`read_text_custom_data`] - Decode a text segment into a position
//! - [`read_binary_custom_data`] - Decode a binary segment from a cursor
//! - [`decode_message`] - Decode a form and payload into a fresh position
//! - [`parse_message_file`] - Decode a file of `<form> <payload>` lines
//! - [`decode_beacon_data`] - Decode a raw beacon block
//!
//! ## Data Types
//! - [`Position`] - Attribute bag plus altitude and network information
//! - [`CellTower`] / [`Network`] - Cellular identity
//! - [`TagCatalog`] - Text-mode tag handlers
//! - [`BINARY_FIELDS`] - Binary-mode layout table
//! - [`DecodeOptions`] - Decoder configuration
//!
//! ## Export Functions
//! - [`export_message_file`] - Run the exports selected in [`ExportOptions`]
//! - [`compute_export_path`] - Helper for consistent path computation

pub mod conversion;
pub mod error;
pub mod export;
pub mod parser;
pub mod types;

pub use conversion::*;
pub use error::*;
pub use export::*;
pub use parser::*;
pub use types::*;
