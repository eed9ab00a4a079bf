//! Selected and hovered longitude.

use super::longitude::{round_to_millidegrees, LongitudePolicy};
use crate::error::LongitudeError;
use crate::geo::Projection;
use crate::solar::{compute_offset_minutes, compute_solar_time, SolarTime};
use eframe::egui::Pos2;

/// Read-out values derived from one longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongitudeReadout {
    pub longitude: f64,
    pub solar_time: SolarTime,
    pub offset_minutes: f64,
}

impl LongitudeReadout {
    pub fn new(longitude: f64) -> Self {
        Self {
            longitude,
            solar_time: compute_solar_time(longitude),
            offset_minutes: compute_offset_minutes(longitude),
        }
    }
}

/// The committed longitude plus the transient one under the pointer.
///
/// Both values have already passed through the longitude policy, so the
/// time formulas and the projection always see the same number.
#[derive(Debug, Clone, PartialEq)]
pub struct LongitudeSelection {
    selected: f64,
    hover: Option<f64>,
    policy: LongitudePolicy,
}

impl Default for LongitudeSelection {
    fn default() -> Self {
        Self {
            selected: 0.0,
            hover: None,
            policy: LongitudePolicy::default(),
        }
    }
}

impl LongitudeSelection {
    /// Creates a selection starting at `initial`, normalized by `policy`.
    pub fn new(initial: f64, policy: LongitudePolicy) -> Result<Self, LongitudeError> {
        Ok(Self {
            selected: policy.normalize(initial)?,
            hover: None,
            policy,
        })
    }

    pub fn selected(&self) -> f64 {
        self.selected
    }

    pub fn hover(&self) -> Option<f64> {
        self.hover
    }

    pub fn policy(&self) -> LongitudePolicy {
        self.policy
    }

    /// Changes the policy and re-applies it to the current selection.
    ///
    /// Values that are in range are unaffected, so this only matters if the
    /// selection somehow sits outside [-180, 180].
    pub fn set_policy(&mut self, policy: LongitudePolicy) -> Result<(), LongitudeError> {
        let selected = policy.normalize(self.selected)?;
        self.policy = policy;
        self.selected = selected;
        Ok(())
    }

    /// Commits a new selected longitude.
    ///
    /// Returns `Ok(true)` if the selection changed and `Ok(false)` if it
    /// already held this value. On error the selection is left untouched.
    pub fn set_selected_longitude(&mut self, value: f64) -> Result<bool, LongitudeError> {
        let normalized = self.policy.normalize(value)?;
        if normalized == self.selected {
            return Ok(false);
        }
        log::debug!("Selected longitude {} -> {}", self.selected, normalized);
        self.selected = normalized;
        Ok(true)
    }

    /// Updates the hover longitude from a pointer position on the canvas.
    ///
    /// Positions outside the map outline clear the hover.
    pub fn on_pointer_move<P: Projection + ?Sized>(&mut self, projection: &P, x: f32, y: f32) {
        self.hover = projection
            .inverse(Pos2::new(x, y))
            .and_then(|coord| self.policy.normalize(round_to_millidegrees(coord.x)).ok());
    }

    /// Clears the hover longitude.
    pub fn on_pointer_leave(&mut self) {
        self.hover = None;
    }

    /// Commits the hover longitude, if any. Returns whether anything changed.
    pub fn on_map_click(&mut self) -> bool {
        match self.hover {
            Some(hover) => self.set_selected_longitude(hover).unwrap_or(false),
            None => false,
        }
    }

    pub fn selected_readout(&self) -> LongitudeReadout {
        LongitudeReadout::new(self.selected)
    }

    pub fn hover_readout(&self) -> Option<LongitudeReadout> {
        self.hover.map(LongitudeReadout::new)
    }
}
