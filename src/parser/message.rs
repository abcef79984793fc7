use crate::error::{DecodeError, Result};
use crate::parser::binary::{read_binary_custom_data_with, DecodeOptions};
use crate::parser::stream::ByteCursor;
use crate::parser::text::read_text_custom_data;
use crate::types::*;
use anyhow::Context;
use std::path::Path;

/// Raw custom-field segment as delivered by the framing layer
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    Text(&'a str),
    Binary(&'a [u8]),
}

/// Decode one message into a fresh position
pub fn decode_message(form: &str, payload: Payload<'_>, options: &DecodeOptions) -> Result<Position> {
    let mut position = Position::new();
    match payload {
        Payload::Text(data) => read_text_custom_data(&mut position, data, form)?,
        Payload::Binary(data) => {
            let mut cursor = ByteCursor::new(data);
            read_binary_custom_data_with(options, &mut position, &mut cursor, form)?;
            if cursor.is_readable() {
                log::debug!(
                    "{} byte(s) left after the last custom field",
                    cursor.remaining()
                );
            }
        }
    }
    Ok(position)
}

/// Decode one `<form> <payload>` line from a message file.
///
/// Returns `None` for blank lines and `#` comments.
pub fn decode_message_line(
    line: &str,
    encoding: Encoding,
    options: &DecodeOptions,
) -> Option<Result<(String, Position)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (form, payload) = line
        .split_once(char::is_whitespace)
        .map(|(form, payload)| (form, payload.trim_start()))
        .unwrap_or((line, ""));

    let result = match encoding {
        Encoding::Text => decode_message(form, Payload::Text(payload), options),
        Encoding::Binary => hex::decode(payload)
            .map_err(DecodeError::from)
            .and_then(|bytes| decode_message(form, Payload::Binary(&bytes), options)),
    };
    Some(result.map(|position| (form.to_string(), position)))
}

/// Decode every message in `content`; failing lines are recorded, not fatal
pub fn parse_message_text(
    content: &str,
    filename: &str,
    encoding: Encoding,
    options: &DecodeOptions,
) -> MessageFile {
    let mut file = MessageFile::new(filename.to_string(), encoding);

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        match decode_message_line(line, encoding, options) {
            None => continue,
            Some(Ok((form, position))) => file.add_message(DecodedMessage {
                line_number,
                form,
                position,
            }),
            Some(Err(err)) => {
                log::warn!("{}:{}: {}", filename, line_number, err);
                file.failures.push(FailedMessage {
                    line_number,
                    error: err.to_string(),
                });
            }
        }
    }

    log::debug!(
        "{}: decoded {} message(s), {} failed",
        filename,
        file.message_count(),
        file.failures.len()
    );
    file
}

/// Read and decode a message file
pub fn parse_message_file(
    file_path: &Path,
    encoding: Encoding,
    options: &DecodeOptions,
) -> anyhow::Result<MessageFile> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read message file: {:?}", file_path))?;

    let filename = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    Ok(parse_message_text(&content, filename, encoding, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_line() {
        let options = DecodeOptions::default();
        let (form, position) = decode_message_line("%SA%RP 9,2100", Encoding::Text, &options)
            .unwrap()
            .unwrap();
        assert_eq!(form, "%SA%RP");
        assert_eq!(position.get(KEY_RPM).and_then(|v| v.as_i64()), Some(2100));
    }

    #[test]
    fn test_decode_binary_line() {
        let options = DecodeOptions::default();
        let (_, position) = decode_message_line("%SA%RP 09083c", Encoding::Binary, &options)
            .unwrap()
            .unwrap();
        assert_eq!(position.get(KEY_SATELLITES).and_then(|v| v.as_i64()), Some(9));
        assert_eq!(position.get(KEY_RPM).and_then(|v| v.as_i64()), Some(0x083c));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let options = DecodeOptions::default();
        assert!(decode_message_line("   ", Encoding::Text, &options).is_none());
        assert!(decode_message_line("# %SA 1", Encoding::Text, &options).is_none());
    }

    #[test]
    fn test_bad_hex_is_reported() {
        let options = DecodeOptions::default();
        let result = decode_message_line("%SA 0", Encoding::Binary, &options).unwrap();
        assert!(matches!(result, Err(DecodeError::InvalidHex(_))));
    }

    #[test]
    fn test_file_keeps_going_after_failure() {
        let content = "# sample\n%SA 9\n%SA nine\n\n%SA%BV 4,120\n";
        let file = parse_message_text(content, "sample.txt", Encoding::Text, &DecodeOptions::default());
        assert_eq!(file.message_count(), 2);
        assert_eq!(file.failures.len(), 1);
        assert_eq!(file.failures[0].line_number, 3);
        assert_eq!(file.messages[1].line_number, 5);
    }
}
