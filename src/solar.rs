//! Longitude-based solar time and UTC offset.
//!
//! Solar time here is a pure function of longitude: the reference meridian
//! (0°) reads 12:00 and every 15° shifts the clock by one hour. It does not
//! depend on the current date or the real position of the sun.

use crate::error::LongitudeError;
use std::fmt;

/// Degrees of longitude per hour of solar time.
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// Minutes of offset per degree of longitude (60 / 15).
pub const MINUTES_PER_DEGREE: f64 = 4.0;

/// Local solar time of day, 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolarTime {
    /// Hour of day (0-23)
    pub hours: u32,
    /// Minute of hour (0-59)
    pub minutes: u32,
}

impl SolarTime {
    /// Computes solar time, rejecting NaN and infinite longitudes.
    pub fn try_from_longitude(longitude: f64) -> Result<Self, LongitudeError> {
        if !longitude.is_finite() {
            return Err(LongitudeError::NonFinite);
        }
        Ok(compute_solar_time(longitude))
    }
}

impl fmt::Display for SolarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_solar_time(self.hours, self.minutes))
    }
}

/// Converts a longitude in degrees to local solar time.
///
/// Negative longitudes use floored modulo so that -15° reads 11:00 rather
/// than a negative hour. Callers must pass a finite value.
pub fn compute_solar_time(longitude: f64) -> SolarTime {
    let mut raw = (longitude / DEGREES_PER_HOUR + 12.0).rem_euclid(24.0);
    // rem_euclid rounds tiny negative operands up to exactly 24.0
    if raw >= 24.0 {
        raw = 0.0;
    }
    let hours = raw.floor();
    let minutes = ((raw - hours) * 60.0).floor();

    SolarTime {
        hours: (hours as u32).min(23),
        minutes: (minutes as u32).min(59),
    }
}

/// Formats hours and minutes as zero-padded `HH:MM`.
pub fn format_solar_time(hours: u32, minutes: u32) -> String {
    format!("{:02}:{:02}", hours, minutes)
}

/// Offset from UTC in minutes for a longitude (east is ahead).
pub fn compute_offset_minutes(longitude: f64) -> f64 {
    MINUTES_PER_DEGREE * longitude
}

/// Formats an offset in minutes with two decimals.
pub fn format_offset_minutes(minutes: f64) -> String {
    format!("{:.2}", minutes)
}

/// Formats a longitude in degrees with two decimals.
pub fn format_longitude(longitude: f64) -> String {
    format!("{:.2}", longitude)
}
