//! Beacon block decoding
//!
//! A beacon block is a run of back-to-back entries with no count. The
//! entry layout is picked by `mode` and each optional field is present only
//! when its `mask` bit is set.

use crate::error::{DecodeError, Result};
use crate::parser::helpers::check_bit;
use crate::parser::stream::ByteCursor;
use crate::types::Position;

const MASK_TAG_ID: u32 = 7;
const TAG_ID_LEN: usize = 6;
const NAME_LEN: usize = 9;

/// Beacon entry layout selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaconMode {
    /// Mode 1: iBeacon-style major/minor/tx power/RSSI
    Proximity,
    /// Mode 2: battery/temperature/tx power/RSSI
    Sensor,
    /// Mode 3: humidity/temperature/RSSI
    Environmental,
    /// Mode 4: hardware id with a hardware-specific payload
    Hardware,
    /// Anything else: entries carry at most the tag id
    Unknown(i32),
}

impl From<i32> for BeaconMode {
    fn from(mode: i32) -> Self {
        match mode {
            1 => BeaconMode::Proximity,
            2 => BeaconMode::Sensor,
            3 => BeaconMode::Environmental,
            4 => BeaconMode::Hardware,
            other => BeaconMode::Unknown(other),
        }
    }
}

/// Outcome of decoding a beacon block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeaconReport {
    /// Entries decoded, which is also the highest `tag{N}` index written
    pub entries: usize,
    /// Trailing bytes left unread because an entry layout consumed nothing
    pub discarded: usize,
}

/// Decode all beacon entries in `data`, numbering them from 1
pub fn decode_beacon_data(position: &mut Position, mode: i32, mask: i32, data: &[u8]) -> Result<BeaconReport> {
    let mode = BeaconMode::from(mode);
    let mut cursor = ByteCursor::new(data);
    let mut index = 1;
    let mut discarded = 0;

    while cursor.is_readable() {
        let start = cursor.pos;

        if check_bit(mask, MASK_TAG_ID) {
            let id = cursor.read_slice(TAG_ID_LEN)?;
            position.set(format!("tag{}Id", index), hex::encode(id));
        }

        match mode {
            BeaconMode::Proximity => decode_proximity(position, &mut cursor, index, mask)?,
            BeaconMode::Sensor => decode_sensor(position, &mut cursor, index, mask)?,
            BeaconMode::Environmental => decode_environmental(position, &mut cursor, index, mask)?,
            BeaconMode::Hardware => decode_hardware(&mut cursor, mask)?,
            BeaconMode::Unknown(_) => {}
        }

        if cursor.pos == start {
            log::warn!(
                "Beacon entry {} consumed no data (mode {:?}, mask {:#04x}), skipping {} trailing byte(s)",
                index,
                mode,
                mask,
                cursor.remaining()
            );
            discarded = cursor.remaining();
            break;
        }
        index += 1;
    }

    Ok(BeaconReport {
        entries: index - 1,
        discarded,
    })
}

/// Decode a `mode:mask:hex` beacon description as carried in a BC field
pub fn decode_beacon_description(position: &mut Position, description: &str) -> Result<BeaconReport> {
    let mut parts = description.splitn(3, ':');
    let (mode, mask, payload) = match (parts.next(), parts.next(), parts.next()) {
        (Some(mode), Some(mask), Some(payload)) => (mode, mask, payload),
        _ => {
            return Err(DecodeError::InvalidBeacon(format!(
                "expected mode:mask:hex, got {:?}",
                description
            )))
        }
    };

    let mode = parse_beacon_number(mode)?;
    let mask = parse_beacon_number(mask)?;
    let data = hex::decode(payload)?;
    decode_beacon_data(position, mode, mask, &data)
}

fn parse_beacon_number(value: &str) -> Result<i32> {
    value.parse().map_err(|_| DecodeError::InvalidNumber {
        tag: "BC".to_string(),
        value: value.to_string(),
    })
}

fn decode_proximity(position: &mut Position, data: &mut ByteCursor, i: usize, mask: i32) -> Result<()> {
    if check_bit(mask, 6) {
        data.read_u16()?; // major
    }
    if check_bit(mask, 5) {
        data.read_u16()?; // minor
    }
    if check_bit(mask, 4) {
        data.read_u8()?; // tx power
    }
    if check_bit(mask, 3) {
        position.set(format!("tag{}Rssi", i), data.read_u8()?);
    }
    Ok(())
}

fn decode_sensor(position: &mut Position, data: &mut ByteCursor, i: usize, mask: i32) -> Result<()> {
    if check_bit(mask, 6) {
        data.read_u16()?; // battery voltage
    }
    if check_bit(mask, 5) {
        position.set(format!("tag{}Temp", i), data.read_u16()?);
    }
    if check_bit(mask, 4) {
        data.read_u8()?; // tx power
    }
    if check_bit(mask, 3) {
        position.set(format!("tag{}Rssi", i), data.read_u8()?);
    }
    Ok(())
}

fn decode_environmental(position: &mut Position, data: &mut ByteCursor, i: usize, mask: i32) -> Result<()> {
    if check_bit(mask, 6) {
        position.set(format!("tag{}Humidity", i), data.read_u16()?);
    }
    if check_bit(mask, 5) {
        position.set(format!("tag{}Temp", i), data.read_u16()?);
    }
    if check_bit(mask, 3) {
        position.set(format!("tag{}Rssi", i), data.read_u8()?);
    }
    if check_bit(mask, 2) {
        data.read_u16()?;
    }
    Ok(())
}

/// Length of the sensor payload that follows a mode 4 hardware id
fn hardware_payload_len(hardware_id: u8) -> usize {
    match hardware_id {
        1 | 4 => 11, // fuel
        2 => 2,      // temperature
        3 => 6,      // temperature and luminosity
        5 => 10,     // temperature, humidity, luminosity and pressure
        _ => 0,
    }
}

fn decode_hardware(data: &mut ByteCursor, mask: i32) -> Result<()> {
    if check_bit(mask, 6) {
        let hardware_id = data.read_u8()?;
        if check_bit(mask, 5) {
            data.skip(hardware_payload_len(hardware_id))?;
        }
    }
    if check_bit(mask, 4) {
        data.skip(NAME_LEN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(position: &Position, key: &str) -> Option<i64> {
        position.get(key).and_then(|v| v.as_i64())
    }

    #[test]
    fn test_proximity_rssi_only() {
        let mut position = Position::new();
        decode_beacon_data(&mut position, 1, 0b0000_1000, &[200]).unwrap();
        assert_eq!(int(&position, "tag1Rssi"), Some(200));
        assert!(!position.has("tag1Id"));
        assert_eq!(position.attributes.len(), 1);
    }

    #[test]
    fn test_proximity_full_entries_with_ids() {
        let mut data = Vec::new();
        for n in 1..=2u8 {
            data.extend_from_slice(&[0xAC, 0x23, 0x3F, 0x00, 0x00, n]); // id
            data.extend_from_slice(&[0x00, 0x01, 0x00, 0x02, 0xC5, 0x40 + n]);
        }
        let mut position = Position::new();
        decode_beacon_data(&mut position, 1, 0xF8, &data).unwrap();

        assert_eq!(
            position.get("tag1Id").and_then(|v| v.as_str()),
            Some("ac233f000001")
        );
        assert_eq!(
            position.get("tag2Id").and_then(|v| v.as_str()),
            Some("ac233f000002")
        );
        assert_eq!(int(&position, "tag1Rssi"), Some(0x41));
        assert_eq!(int(&position, "tag2Rssi"), Some(0x42));
    }

    #[test]
    fn test_sensor_keeps_temperature_and_rssi() {
        let mut position = Position::new();
        // battery, temp, tx power, rssi
        let data = [0x0B, 0xB8, 0x00, 0x19, 0xC5, 0x50];
        decode_beacon_data(&mut position, 2, 0x78, &data).unwrap();
        assert_eq!(int(&position, "tag1Temp"), Some(25));
        assert_eq!(int(&position, "tag1Rssi"), Some(0x50));
        assert_eq!(position.attributes.len(), 2);
    }

    #[test]
    fn test_environmental_layout() {
        let mut position = Position::new();
        // humidity, temp, rssi, extra
        let data = [0x00, 0x37, 0x00, 0x16, 0x60, 0xFF, 0xFF];
        decode_beacon_data(&mut position, 3, 0x6C, &data).unwrap();
        assert_eq!(int(&position, "tag1Humidity"), Some(55));
        assert_eq!(int(&position, "tag1Temp"), Some(22));
        assert_eq!(int(&position, "tag1Rssi"), Some(0x60));
    }

    #[test]
    fn test_hardware_mode_skips_payload() {
        assert_eq!(hardware_payload_len(1), 11);
        assert_eq!(hardware_payload_len(4), 11);
        assert_eq!(hardware_payload_len(2), 2);
        assert_eq!(hardware_payload_len(3), 6);
        assert_eq!(hardware_payload_len(5), 10);
        assert_eq!(hardware_payload_len(9), 0);

        // two entries: id 2 with 2 byte payload, then id 3 with 6 bytes
        let mut data = vec![2, 0xAA, 0xBB];
        data.extend_from_slice(&[3, 1, 2, 3, 4, 5, 6]);
        let mut position = Position::new();
        decode_beacon_data(&mut position, 4, 0x60, &data).unwrap();
        assert!(position.attributes.is_empty());
    }

    #[test]
    fn test_unknown_mode_reads_only_ids() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let mut position = Position::new();
        decode_beacon_data(&mut position, 7, 0x80, &data).unwrap();
        assert_eq!(
            position.get("tag2Id").and_then(|v| v.as_str()),
            Some("0708090a0b0c")
        );
        assert_eq!(position.attributes.len(), 2);
    }

    #[test]
    fn test_entry_consuming_nothing_stops() {
        let mut position = Position::new();
        let report = decode_beacon_data(&mut position, 9, 0x00, &[1, 2, 3]).unwrap();
        assert!(position.attributes.is_empty());
        assert_eq!(
            report,
            BeaconReport {
                entries: 0,
                discarded: 3
            }
        );

        // mode 2 has no field on bit 2
        let report = decode_beacon_data(&mut position, 2, 0x04, &[1, 2, 3]).unwrap();
        assert_eq!(report.entries, 0);
        assert_eq!(report.discarded, 3);
    }

    #[test]
    fn test_hardware_mode_name_only() {
        let mut position = Position::new();
        let report = decode_beacon_data(&mut position, 4, 0x10, &[0; 18]).unwrap();
        assert_eq!(
            report,
            BeaconReport {
                entries: 2,
                discarded: 0
            }
        );
        assert!(position.attributes.is_empty());
    }

    #[test]
    fn test_hardware_id_without_payload() {
        // bit 5 clear: the payload length of the hardware id is not applied
        let mut position = Position::new();
        let report = decode_beacon_data(&mut position, 4, 0x40, &[1, 5, 2]).unwrap();
        assert_eq!(report.entries, 3);
        assert_eq!(report.discarded, 0);
    }

    #[test]
    fn test_report_counts_entries() {
        let mut position = Position::new();
        let report = decode_beacon_description(&mut position, "1:8:c8c9ca").unwrap();
        assert_eq!(report.entries, 3);
        assert_eq!(int(&position, "tag3Rssi"), Some(0xCA));

        let report = decode_beacon_description(&mut position, "1:8:").unwrap();
        assert_eq!(report, BeaconReport::default());
    }

    #[test]
    fn test_truncated_entry_keeps_earlier_entries() {
        let mut position = Position::new();
        // rssi + major + minor + tx per entry = 6 bytes, second entry cut short
        let data = [0, 1, 0, 2, 3, 90, 0, 1];
        let err = decode_beacon_data(&mut position, 1, 0x78, &data).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
        assert_eq!(int(&position, "tag1Rssi"), Some(90));
        assert!(!position.has("tag2Rssi"));
    }

    #[test]
    fn test_description_parsing() {
        let mut position = Position::new();
        decode_beacon_description(&mut position, "1:8:C8").unwrap();
        assert_eq!(int(&position, "tag1Rssi"), Some(200));

        assert!(matches!(
            decode_beacon_description(&mut Position::new(), "1:8"),
            Err(DecodeError::InvalidBeacon(_))
        ));
        assert!(matches!(
            decode_beacon_description(&mut Position::new(), "x:8:C8"),
            Err(DecodeError::InvalidNumber { .. })
        ));
        assert!(matches!(
            decode_beacon_description(&mut Position::new(), "1:8:C"),
            Err(DecodeError::InvalidHex(_))
        ));
    }
}
