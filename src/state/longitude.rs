//! Normalization policy for longitude input.

use crate::error::LongitudeError;
use serde::{Deserialize, Serialize};

/// Smallest valid longitude in degrees.
pub const MIN_LONGITUDE: f64 = -180.0;
/// Largest valid longitude in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// How out-of-range longitudes are handled before they reach the time
/// formulas or the projection.
///
/// Values already inside [-180, 180] pass through unchanged under every
/// policy, so both ends of the range keep their own offsets (±720 minutes).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LongitudePolicy {
    /// Wrap modulo 360 into [-180, 180).
    #[default]
    Wrap,
    /// Clamp to [-180, 180].
    Clamp,
    /// Refuse the value.
    Reject,
}

impl LongitudePolicy {
    pub fn label(&self) -> &'static str {
        match self {
            LongitudePolicy::Wrap => "Wrap",
            LongitudePolicy::Clamp => "Clamp",
            LongitudePolicy::Reject => "Reject",
        }
    }

    pub fn all() -> &'static [LongitudePolicy] {
        &[
            LongitudePolicy::Wrap,
            LongitudePolicy::Clamp,
            LongitudePolicy::Reject,
        ]
    }

    /// Applies the policy to a raw longitude.
    pub fn normalize(&self, longitude: f64) -> Result<f64, LongitudeError> {
        if !longitude.is_finite() {
            return Err(LongitudeError::NonFinite);
        }
        if (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Ok(longitude);
        }

        match self {
            LongitudePolicy::Wrap => Ok(wrap_longitude(longitude)),
            LongitudePolicy::Clamp => Ok(longitude.clamp(MIN_LONGITUDE, MAX_LONGITUDE)),
            LongitudePolicy::Reject => Err(LongitudeError::OutOfRange(longitude)),
        }
    }
}

/// Wraps any finite longitude into [-180, 180).
pub fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Rounds to three decimal places, the resolution used for pointer hover.
pub fn round_to_millidegrees(longitude: f64) -> f64 {
    (longitude * 1000.0).round() / 1000.0
}
