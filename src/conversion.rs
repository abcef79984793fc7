//! Unit conversion utilities
//!
//! Scaling constants used by the custom-field tables. Durations are
//! milliseconds, distances meters.

/// Meters in one statute mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// Milliseconds in one hour
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Convert miles to meters
pub fn meters_from_miles(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

/// Convert an engine-hours counter in tenths of an hour to milliseconds
pub fn ms_from_tenth_hours(tenths: i64) -> i64 {
    tenths * (MS_PER_HOUR / 10)
}

/// Convert a reading in tenths of a volt to volts
pub fn volts_from_decivolts(raw: f64) -> f64 {
    raw * 0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_from_miles() {
        assert!((meters_from_miles(1.0) - 1609.344).abs() < 1e-9);
        assert_eq!(meters_from_miles(0.0), 0.0);
    }

    #[test]
    fn test_hour_counters() {
        assert_eq!(ms_from_tenth_hours(10), MS_PER_HOUR);
        assert_eq!(ms_from_tenth_hours(1), 360_000);
        assert_eq!(MS_PER_HOUR / 20, 180_000);
    }

    #[test]
    fn test_volts() {
        assert!((volts_from_decivolts(121.0) - 12.1).abs() < 1e-9);
    }
}
