//! Binary-mode custom-field decoding
//!
//! Binary payloads carry no lengths: the width of every field is implied by
//! its tag. The layout lives in one table, [`BINARY_FIELDS`], and any width
//! mistake there shifts every field that follows.

use crate::conversion::{meters_from_miles, MS_PER_HOUR};
use crate::error::{DecodeError, Result};
use crate::parser::beacon::decode_beacon_description;
use crate::parser::cell::{CellIdRule, CellTowerAccumulator};
use crate::parser::helpers::parse_form;
use crate::parser::stream::ByteCursor;
use crate::types::*;

/// Options for binary decoding
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Fail on tags missing from the binary layout table instead of
    /// skipping them with zero width
    pub strict_binary_tags: bool,
}

/// How many bytes a binary field occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U8,
    U16,
    U32,
    U64,
    /// Opaque block of fixed length
    Bytes(usize),
    /// NUL-terminated ASCII, terminator included
    CString,
}

/// What to do with the value once it has been read
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Discard,
    /// Unsigned value as-is
    Int(&'static str),
    /// Value multiplied by a float factor
    Scaled(&'static str, f64),
    /// Value multiplied by an integer factor
    IntScaled(&'static str, i64),
    /// Value plus a signed offset
    Offset(&'static str, i64),
    /// `value > 0`
    Flag(&'static str),
    /// `value == 1`
    Equals(&'static str, u64),
    /// Sets the alarm attribute when the value is non-zero
    Alarm(&'static str),
    Text(&'static str),
    Altitude,
    Odometer,
    CellId,
    LocationAreaCode,
    SignalStrength,
    /// Decimal `cccnn` packed into a u32
    MobileCodes,
    /// `mode:mask:hex` beacon description.
    ///
    /// Device documentation gives no binary layout for BC. This crate reads
    /// it as the NUL-terminated ASCII form of the text encoding.
    Beacon,
}

/// One entry of the binary layout table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryField {
    pub tag: &'static str,
    pub width: Width,
    pub transform: Transform,
}

const fn field(tag: &'static str, width: Width, transform: Transform) -> BinaryField {
    BinaryField {
        tag,
        width,
        transform,
    }
}

use Transform::*;
use Width::*;

/// Binary layout of every tag the device family can send
pub const BINARY_FIELDS: &[BinaryField] = &[
    field("SA", U8, Int(KEY_SATELLITES)),
    field("MV", U16, Scaled(KEY_POWER, 0.1)),
    field("BV", U16, Scaled(KEY_BATTERY, 0.1)),
    field("GQ", U8, SignalStrength),
    field("CE", U32, CellId),
    field("LC", U16, LocationAreaCode),
    field("CN", U32, MobileCodes),
    field("RL", U8, Discard), // rxlev
    field("PC", U32, Int(KEY_COUNT1)),
    field("AT", U32, Altitude),
    field("RP", U16, Int(KEY_RPM)),
    field("GS", U8, Int(KEY_RSSI)),
    field("DT", U8, Equals(KEY_ARCHIVE, 1)),
    field("VN", CString, Text(KEY_VIN)),
    field("MF", U16, Discard), // mass air flow rate
    field("EL", U8, Discard), // engine load
    field("TR", U8, Int(KEY_THROTTLE)),
    field("ET", U16, Int(KEY_TEMP1)),
    field("FL", U8, Int(KEY_FUEL_LEVEL)),
    field("ML", U8, Discard), // mil status
    field("FC", U32, Int(KEY_FUEL_CONSUMPTION)),
    field("CI", CString, Discard), // format string
    field("AV1", U16, Int(KEY_ADC1)),
    field("NC", CString, Discard), // gsm neighbor cell info
    field("SM", U16, Discard), // max speed between reports
    field("GL", CString, Discard), // google link
    field("MA", CString, Discard), // mac address
    field("PD", U8, Discard), // pending code status
    field("CD", CString, Text(KEY_ICCID)),
    field("CM", U64, Discard), // imsi
    field("GN", Bytes(60), Discard), // g sensor data
    field("GV", Bytes(6), Discard), // maximum g force
    field("ME", U64, Discard), // imei
    field("IA", U8, Discard), // intake air temperature
    field("MP", U8, Discard), // manifold absolute pressure
    field("EO", U32, Odometer),
    field("EH", U32, IntScaled(KEY_HOURS, MS_PER_HOUR / 10)),
    field("ZO1", U8, Discard), // brake stroke status
    field("ZO2", U8, Discard), // warning indicator status
    field("ZO3", U8, Discard), // abs control status
    field("ZO4", U8, Scaled(KEY_THROTTLE, 0.4)),
    field("ZO5", U8, Discard), // parking brake status
    field("ZO6", U8, Scaled(KEY_OBD_SPEED, 0.805)),
    field("ZO7", U8, Discard), // cruise control status
    field("ZO8", U8, Discard), // accelerator pedal position
    field("ZO9", U8, Scaled(KEY_ENGINE_LOAD, 0.5)),
    field("ZO10", U8, Scaled(KEY_FUEL_LEVEL, 0.5)),
    field("ZO11", U8, Discard), // engine oil pressure
    field("ZO12", U8, Discard), // boost pressure
    field("ZO13", U8, Discard), // intake temperature
    field("ZO14", U8, Int(KEY_COOLANT_TEMP)),
    field("ZO15", U8, Discard), // brake application pressure
    field("ZO16", U8, Discard), // brake primary pressure
    field("ZO17", U8, Discard), // brake secondary pressure
    field("ZH1", U16, Discard), // cargo weight
    field("ZH2", U16, Scaled(KEY_FUEL_CONSUMPTION, 16.428 / 3600.0)),
    field("ZH3", U16, Scaled(KEY_RPM, 0.25)),
    field("ZL1", U32, Discard), // fuel used (natural gas)
    field("ZL2", U32, IntScaled(KEY_ODOMETER, 161)),
    field("ZL3", U32, Discard), // vehicle hours
    field("ZL4", U32, IntScaled(KEY_HOURS, MS_PER_HOUR / 20)),
    field("ZS1", CString, Text(KEY_VIN)),
    field("JO1", U8, Discard), // pedals
    field("JO2", U8, Discard), // power takeoff device
    field("JO3", U8, Discard), // accelerator pedal position
    field("JO4", U8, Int(KEY_ENGINE_LOAD)),
    field("JO5", U8, Scaled(KEY_FUEL_LEVEL, 0.4)),
    field("JO6", U8, Discard), // fms vehicle interface
    field("JO7", U8, Discard), // driver 2
    field("JO8", U8, Discard), // driver 1
    field("JO9", U8, Discard), // drivers
    field("JO10", U8, Discard), // system information
    field("JO11", U8, Offset(KEY_COOLANT_TEMP, -40)),
    field("JO12", U8, Discard), // pto engaged
    field("JH1", U16, Scaled(KEY_OBD_SPEED, 1.0 / 256.0)),
    field("JH2", U16, Scaled(KEY_RPM, 0.125)),
    field("JH3", U16, Scaled("axleWeight1", 0.5)),
    field("JH4", U16, Scaled("axleWeight2", 0.5)),
    field("JH5", U16, Scaled("axleWeight3", 0.5)),
    field("JH6", U16, Scaled("axleWeight4", 0.5)),
    field("JH7", U16, Scaled("axleWeight5", 0.5)),
    field("JH8", U16, IntScaled(KEY_ODOMETER_SERVICE, 5)),
    field("JH9", U16, Discard), // tachograph speed
    field("JH10", U16, Discard), // ambient air temperature
    field("JH11", U16, Scaled(KEY_FUEL_CONSUMPTION, 0.05)),
    field("JH12", U16, Discard), // fuel economy
    field("JL1", U32, Scaled(KEY_FUEL_USED, 0.5)),
    field("JL2", U32, IntScaled(KEY_HOURS, MS_PER_HOUR / 20)),
    field("JL3", U32, IntScaled(KEY_ODOMETER, 1000)),
    field("JL4", U32, Scaled(KEY_FUEL_USED, 0.001)),
    field("JS1", CString, Text(KEY_VIN)),
    field("JS2", CString, Discard), // fms version supported
    field("JS3", CString, Text(KEY_DRIVER1)),
    field("JS4", CString, Text(KEY_DRIVER2)),
    field("JN1", U32, Discard), // cruise control distance
    field("JN2", U32, Discard), // excessive idling time
    field("JN3", U32, Discard), // excessive idling fuel
    field("JN4", U32, Discard), // pto time
    field("JN5", U32, Discard), // pto fuel
    field("IN0", U8, Flag(KEY_IGNITION)),
    field("IN1", U8, Flag(KEY_IN1)),
    field("IN2", U8, Flag(KEY_IN2)),
    field("IN3", U8, Flag(KEY_IN3)),
    field("HA", U8, Alarm(ALARM_ACCELERATION)),
    field("HB", U8, Alarm(ALARM_BRAKING)),
    field("HC", U8, Alarm(ALARM_CORNERING)),
    field("BC", CString, Beacon),
];

/// Look up the binary layout of `tag`
pub fn binary_field(tag: &str) -> Option<&'static BinaryField> {
    BINARY_FIELDS.iter().find(|f| f.tag == tag)
}

/// Raw value read from the cursor before the transform is applied
enum RawValue {
    Number(u64),
    Text(Option<String>),
    Skipped,
}

fn read_raw(cursor: &mut ByteCursor, width: Width) -> Result<RawValue> {
    Ok(match width {
        U8 => RawValue::Number(cursor.read_u8()? as u64),
        U16 => RawValue::Number(cursor.read_u16()? as u64),
        U32 => RawValue::Number(cursor.read_u32()? as u64),
        U64 => RawValue::Number(cursor.read_u64()?),
        Bytes(len) => {
            cursor.skip(len)?;
            RawValue::Skipped
        }
        CString => RawValue::Text(cursor.read_cstring()?),
    })
}

fn apply(
    field: &BinaryField,
    raw: RawValue,
    position: &mut Position,
    cell: &mut CellTowerAccumulator,
) -> Result<()> {
    let number = match raw {
        RawValue::Number(n) => n,
        RawValue::Text(text) => {
            match field.transform {
                Text(key) => position.set_text(key, text.as_deref()),
                Beacon => {
                    if let Some(description) = text {
                        decode_beacon_description(position, &description)?;
                    }
                }
                _ => {}
            }
            return Ok(());
        }
        RawValue::Skipped => return Ok(()),
    };

    let value = number as i64;
    match field.transform {
        Discard | Text(_) | Beacon => {}
        Int(key) => position.set(key, value),
        Scaled(key, factor) => position.set(key, value as f64 * factor),
        IntScaled(key, factor) => position.set(key, value * factor),
        Offset(key, offset) => position.set(key, value + offset),
        Flag(key) => position.set(key, value > 0),
        Equals(key, expected) => position.set(key, number == expected),
        Alarm(alarm) => {
            if value > 0 {
                position.set(KEY_ALARM, alarm);
            }
        }
        Altitude => position.set_altitude(value as f64),
        Odometer => position.set(KEY_ODOMETER, meters_from_miles(value as f64)),
        CellId => cell.set_cell_id(value),
        LocationAreaCode => cell.set_location_area_code(value as i32),
        SignalStrength => cell.set_signal_strength(value as i32),
        MobileCodes => {
            let combined = (number % 100_000) as i32; // cccnn
            cell.set_mobile_country_code(combined / 100);
            cell.set_mobile_network_code(combined % 100);
        }
    }
    Ok(())
}

/// Decode a binary custom-field segment with default options
pub fn read_binary_custom_data(position: &mut Position, cursor: &mut ByteCursor, form: &str) -> Result<()> {
    read_binary_custom_data_with(&DecodeOptions::default(), position, cursor, form)
}

/// Decode a binary custom-field segment.
///
/// Tags missing from [`BINARY_FIELDS`] consume no bytes unless
/// `strict_binary_tags` is set. A field cut short by the end of the data
/// fails the decode without storing anything for that field.
pub fn read_binary_custom_data_with(
    options: &DecodeOptions,
    position: &mut Position,
    cursor: &mut ByteCursor,
    form: &str,
) -> Result<()> {
    let mut cell = CellTowerAccumulator::new();

    for tag in parse_form(form) {
        let Some(field) = binary_field(tag) else {
            if options.strict_binary_tags {
                return Err(DecodeError::UnknownTag(tag.to_string()));
            }
            log::warn!(
                "Binary tag {} has no known layout, following fields may be misaligned (offset {})",
                tag,
                cursor.pos
            );
            continue;
        };

        let raw = read_raw(cursor, field.width)?;
        log::debug!("Decoded binary tag {} (offset now {})", tag, cursor.pos);
        apply(field, raw, position, &mut cell)?;
    }

    cell.finalize(position, CellIdRule::NonZero);
    Ok(())
}
