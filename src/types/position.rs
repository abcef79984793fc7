use crate::types::Network;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Attribute keys shared with the rest of the tracking platform
pub const KEY_SATELLITES: &str = "sat";
pub const KEY_POWER: &str = "power";
pub const KEY_BATTERY: &str = "battery";
pub const KEY_RSSI: &str = "rssi";
pub const KEY_RPM: &str = "rpm";
pub const KEY_ARCHIVE: &str = "archive";
pub const KEY_VIN: &str = "vin";
pub const KEY_THROTTLE: &str = "throttle";
pub const KEY_COOLANT_TEMP: &str = "coolantTemp";
pub const KEY_FUEL_LEVEL: &str = "fuel";
pub const KEY_FUEL_CONSUMPTION: &str = "fuelConsumption";
pub const KEY_FUEL_USED: &str = "fuelUsed";
pub const KEY_ICCID: &str = "iccid";
pub const KEY_HOURS: &str = "hours";
pub const KEY_ENGINE_LOAD: &str = "engineLoad";
pub const KEY_INTAKE_TEMP: &str = "intakeTemp";
pub const KEY_ALARM: &str = "alarm";
pub const KEY_MOTION: &str = "motion";
pub const KEY_ODOMETER: &str = "odometer";
pub const KEY_ODOMETER_SERVICE: &str = "serviceOdometer";
pub const KEY_OBD_SPEED: &str = "obdSpeed";
pub const KEY_IGNITION: &str = "ignition";
pub const KEY_DRIVER1: &str = "driver1";
pub const KEY_DRIVER2: &str = "driver2";

// First channel of the numbered counter, adc, temperature and input keys
pub const KEY_COUNT1: &str = "count1";
pub const KEY_ADC1: &str = "adc1";
pub const KEY_TEMP1: &str = "temp1";
pub const KEY_IN1: &str = "in1";
pub const KEY_IN2: &str = "in2";
pub const KEY_IN3: &str = "in3";

pub const ALARM_ACCELERATION: &str = "hardAcceleration";
pub const ALARM_BRAKING: &str = "hardBraking";
pub const ALARM_CORNERING: &str = "hardCornering";

/// A single decoded attribute value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(value) => Some(*value as f64),
            AttributeValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(value) => write!(f, "{}", value),
            AttributeValue::Int(value) => write!(f, "{}", value),
            AttributeValue::Float(value) => write!(f, "{}", value),
            AttributeValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value as i64)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<u8> for AttributeValue {
    fn from(value: u8) -> Self {
        AttributeValue::Int(value as i64)
    }
}

impl From<u16> for AttributeValue {
    fn from(value: u16) -> Self {
        AttributeValue::Int(value as i64)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Int(value as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

/// Position record the custom fields are attached to.
///
/// Only the parts touched by custom-field decoding are modelled here: the
/// attribute bag, the altitude and the network information. Attributes are
/// write-mostly; setting an existing key overwrites it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub altitude: Option<f64>,
    pub network: Option<Network>,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value under the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Set a text attribute; empty or missing strings are not stored
    pub fn set_text(&mut self, key: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.attributes
                .insert(key.into(), AttributeValue::Text(value.to_string()));
        }
    }

    pub fn set_altitude(&mut self, altitude: f64) {
        self.altitude = Some(altitude);
    }

    pub fn set_network(&mut self, network: Network) {
        self.network = Some(network);
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_last_write_wins() {
        let mut position = Position::new();
        position.set(KEY_ALARM, ALARM_BRAKING);
        position.set(KEY_ALARM, ALARM_CORNERING);
        assert_eq!(
            position.get(KEY_ALARM).and_then(|v| v.as_str()),
            Some(ALARM_CORNERING)
        );
        assert_eq!(position.attributes.len(), 1);
    }

    #[test]
    fn test_set_text_skips_empty() {
        let mut position = Position::new();
        position.set_text(KEY_VIN, Some(""));
        position.set_text(KEY_VIN, None);
        assert!(!position.has(KEY_VIN));

        position.set_text(KEY_VIN, Some("1HGCM82633A004352"));
        assert_eq!(
            position.get(KEY_VIN).and_then(|v| v.as_str()),
            Some("1HGCM82633A004352")
        );
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(AttributeValue::from(7u8).as_i64(), Some(7));
        assert_eq!(AttributeValue::from(7u8).as_f64(), Some(7.0));
        assert_eq!(AttributeValue::from(1.5).as_i64(), None);
        assert_eq!(AttributeValue::from(true).as_bool(), Some(true));
    }
}
