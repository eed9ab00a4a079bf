//! Application state management.
//!
//! The only mutable domain state is the longitude selection; everything
//! else here is display toggles or memoized derived values.

pub mod longitude;
mod markers;
mod selection;

pub use longitude::LongitudePolicy;
pub use markers::{MarkerCache, MarkerLayout, PathCache};
pub use selection::{LongitudeReadout, LongitudeSelection};

use crate::config::AppConfig;
use crate::error::LongitudeError;

/// Root application state.
#[derive(Default)]
pub struct AppState {
    /// Selected and hovered longitude
    pub selection: LongitudeSelection,

    /// Draw meridians and parallels beneath the countries
    pub show_graticule: bool,

    /// Status message displayed in the top bar
    pub status_message: String,
}

impl AppState {
    /// Builds the initial state from configuration.
    ///
    /// An initial longitude the policy refuses falls back to 0°.
    pub fn from_config(config: &AppConfig) -> Self {
        let (selection, status_message) =
            match LongitudeSelection::new(config.initial_longitude, config.longitude_policy) {
                Ok(selection) => (selection, "Ready".to_string()),
                Err(e) => {
                    log::warn!("Ignoring initial longitude: {}", e);
                    (
                        LongitudeSelection::new(0.0, config.longitude_policy)
                            .unwrap_or_default(),
                        format!("Initial longitude ignored: {}", e),
                    )
                }
            };

        Self {
            selection,
            show_graticule: config.show_graticule,
            status_message,
        }
    }

    /// Commits a longitude from a UI control, reporting rejections in the
    /// status line.
    pub fn commit_longitude(&mut self, value: f64) {
        match self.selection.set_selected_longitude(value) {
            Ok(_) => self.status_message = "Ready".to_string(),
            Err(e) => self.report_rejection(e),
        }
    }

    /// Switches the longitude policy.
    pub fn change_policy(&mut self, policy: LongitudePolicy) {
        match self.selection.set_policy(policy) {
            Ok(()) => {
                log::info!("Longitude policy set to {}", policy.label());
                self.status_message = format!("Out-of-range longitudes: {}", policy.label());
            }
            Err(e) => self.report_rejection(e),
        }
    }

    fn report_rejection(&mut self, error: LongitudeError) {
        log::warn!("Rejected longitude: {}", error);
        self.status_message = format!("Rejected: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = AppConfig {
            initial_longitude: -75.0,
            show_graticule: false,
            ..Default::default()
        };
        let state = AppState::from_config(&config);
        assert_eq!(state.selection.selected(), -75.0);
        assert!(!state.show_graticule);
        assert_eq!(state.status_message, "Ready");
    }

    #[test]
    fn test_from_config_with_rejected_longitude() {
        let config = AppConfig {
            initial_longitude: 400.0,
            longitude_policy: LongitudePolicy::Reject,
            ..Default::default()
        };
        let state = AppState::from_config(&config);
        assert_eq!(state.selection.selected(), 0.0);
        assert_eq!(state.selection.policy(), LongitudePolicy::Reject);
        assert!(state.status_message.starts_with("Initial longitude ignored"));
    }

    #[test]
    fn test_commit_longitude_reports_rejection() {
        let mut state = AppState::from_config(&AppConfig::default());
        state.change_policy(LongitudePolicy::Reject);

        state.commit_longitude(12.5);
        assert_eq!(state.selection.selected(), 12.5);
        assert_eq!(state.status_message, "Ready");

        state.commit_longitude(181.0);
        assert_eq!(state.selection.selected(), 12.5);
        assert!(state.status_message.starts_with("Rejected"));
    }
}
