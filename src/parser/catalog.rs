//! Text-mode tag catalog
//!
//! Maps each custom-field tag to the handler that decodes its text value.
//! The catalog is built once and shared read-only between decoders.

use crate::conversion::{ms_from_tenth_hours, volts_from_decivolts};
use crate::error::{DecodeError, Result};
use crate::parser::beacon::decode_beacon_description;
use crate::parser::cell::CellTowerAccumulator;
use crate::types::*;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Decodes one text value onto the position or the cell accumulator
pub type TextHandler = fn(&mut Position, &mut CellTowerAccumulator, &str) -> Result<()>;

/// Immutable tag → handler table for the text encoding
pub struct TagCatalog {
    handlers: HashMap<&'static str, TextHandler>,
}

impl fmt::Debug for TagCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagCatalog")
            .field("tags", &self.tags())
            .finish()
    }
}

static CATALOG: OnceLock<TagCatalog> = OnceLock::new();

impl TagCatalog {
    pub fn new() -> Self {
        let entries: [(&'static str, TextHandler); 27] = [
            ("SA", process_sa),
            ("BV", process_bv),
            ("MV", process_mv),
            ("GQ", process_gq),
            ("CE", process_ce),
            ("LC", process_lc),
            ("CN", process_cn),
            ("PC", process_pc),
            ("AT", process_at),
            ("RP", process_rp),
            ("GS", process_gs),
            ("DT", process_dt),
            ("VN", process_vn),
            ("TR", process_tr),
            ("ET", process_et),
            ("FL", process_fl),
            ("FC", process_fc),
            ("AV1", process_av1),
            ("CD", process_cd),
            ("EH", process_eh),
            ("IA", process_ia),
            ("EL", process_el),
            ("HA", process_ha),
            ("HB", process_hb),
            ("HC", process_hc),
            ("MT", process_mt),
            ("BC", process_bc),
        ];
        Self {
            handlers: entries.into_iter().collect(),
        }
    }

    /// Process-wide catalog, built on first use
    pub fn global() -> &'static TagCatalog {
        CATALOG.get_or_init(TagCatalog::new)
    }

    /// Handler for `tag`; unknown tags get a handler that does nothing
    pub fn lookup(&self, tag: &str) -> TextHandler {
        self.handlers.get(tag).copied().unwrap_or(process_unknown)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Supported tags in sorted order
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.handlers.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn parse<T: FromStr>(tag: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| DecodeError::InvalidNumber {
        tag: tag.to_string(),
        value: value.to_string(),
    })
}

fn process_sa(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_SATELLITES, parse::<i32>("SA", value)?);
    Ok(())
}

fn process_bv(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    let raw = parse::<i32>("BV", value)?;
    position.set(KEY_BATTERY, volts_from_decivolts(raw as f64));
    Ok(())
}

fn process_mv(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    let raw = parse::<i32>("MV", value)?;
    position.set(KEY_POWER, volts_from_decivolts(raw as f64));
    Ok(())
}

fn process_gq(_: &mut Position, cell: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    cell.set_signal_strength(parse("GQ", value)?);
    Ok(())
}

fn process_ce(_: &mut Position, cell: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    cell.set_cell_id(parse("CE", value)?);
    Ok(())
}

fn process_lc(_: &mut Position, cell: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    cell.set_location_area_code(parse("LC", value)?);
    Ok(())
}

// MCC is always three digits, the MNC takes whatever follows
fn process_cn(_: &mut Position, cell: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    if value.len() > 3 {
        let (mcc, mnc) = match (value.get(..3), value.get(3..)) {
            (Some(mcc), Some(mnc)) => (mcc, mnc),
            _ => {
                return Err(DecodeError::InvalidNumber {
                    tag: "CN".to_string(),
                    value: value.to_string(),
                })
            }
        };
        cell.set_mobile_country_code(parse("CN", mcc)?);
        cell.set_mobile_network_code(parse("CN", mnc)?);
    }
    Ok(())
}

fn process_pc(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_COUNT1, parse::<i32>("PC", value)?);
    Ok(())
}

fn process_at(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set_altitude(parse::<i32>("AT", value)? as f64);
    Ok(())
}

fn process_rp(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_RPM, parse::<i32>("RP", value)?);
    Ok(())
}

fn process_gs(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_RSSI, parse::<i32>("GS", value)?);
    Ok(())
}

fn process_dt(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_ARCHIVE, parse::<i32>("DT", value)? == 1);
    Ok(())
}

fn process_vn(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set_text(KEY_VIN, Some(value));
    Ok(())
}

fn process_tr(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_THROTTLE, parse::<i32>("TR", value)?);
    Ok(())
}

fn process_et(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_COOLANT_TEMP, parse::<i32>("ET", value)?);
    Ok(())
}

fn process_fl(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_FUEL_LEVEL, parse::<i32>("FL", value)?);
    Ok(())
}

fn process_fc(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_FUEL_CONSUMPTION, parse::<i32>("FC", value)?);
    Ok(())
}

fn process_av1(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_ADC1, parse::<i32>("AV1", value)?);
    Ok(())
}

fn process_cd(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set_text(KEY_ICCID, Some(value));
    Ok(())
}

fn process_eh(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    let tenths = parse::<i32>("EH", value)?;
    position.set(KEY_HOURS, ms_from_tenth_hours(tenths as i64));
    Ok(())
}

fn process_ia(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_INTAKE_TEMP, parse::<i32>("IA", value)?);
    Ok(())
}

fn process_el(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_ENGINE_LOAD, parse::<i32>("EL", value)?);
    Ok(())
}

fn set_alarm_if_active(position: &mut Position, tag: &str, value: &str, alarm: &str) -> Result<()> {
    if parse::<i32>(tag, value)? > 0 {
        position.set(KEY_ALARM, alarm);
    }
    Ok(())
}

fn process_ha(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    set_alarm_if_active(position, "HA", value, ALARM_ACCELERATION)
}

fn process_hb(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    set_alarm_if_active(position, "HB", value, ALARM_BRAKING)
}

fn process_hc(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    set_alarm_if_active(position, "HC", value, ALARM_CORNERING)
}

fn process_mt(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    position.set(KEY_MOTION, parse::<i32>("MT", value)? > 0);
    Ok(())
}

fn process_bc(position: &mut Position, _: &mut CellTowerAccumulator, value: &str) -> Result<()> {
    let report = decode_beacon_description(position, value)?;
    log::debug!("BC carried {} beacon entries", report.entries);
    Ok(())
}

fn process_unknown(_: &mut Position, _: &mut CellTowerAccumulator, _: &str) -> Result<()> {
    Ok(())
}
