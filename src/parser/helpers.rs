//! Helper functions shared by the text and binary decoders
//!
//! Form header splitting, value list splitting and bit checks used by the
//! beacon layouts.

/// Check whether bit `index` is set in `value`
pub fn check_bit(value: i32, index: u32) -> bool {
    index < 32 && (value >> index) & 1 != 0
}

/// Split a form header into its ordered tag list.
///
/// The first byte is a delimiter and is dropped; the rest is split on `%`.
/// An empty header yields no tags.
pub fn parse_form(form: &str) -> Vec<&str> {
    let mut chars = form.chars();
    if chars.next().is_none() {
        return Vec::new();
    }
    chars.as_str().split('%').collect()
}

/// Split a text payload on `,` and CRLF.
///
/// Trailing empty values are dropped so a payload ending in a separator
/// does not produce a phantom value. An empty payload has no values.
pub fn split_values(data: &str) -> Vec<&str> {
    let mut values: Vec<&str> = data
        .split("\r\n")
        .flat_map(|line| line.split(','))
        .collect();
    while values.last().map_or(false, |v| v.is_empty()) {
        values.pop();
    }
    values
}
