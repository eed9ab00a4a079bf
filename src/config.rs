//! Configuration loading.
//!
//! Settings live in a TOML file in the platform config directory. Command
//! line flags override individual values.

use crate::cli::Args;
use crate::error::ConfigError;
use crate::geo::DEFAULT_PRECISION;
use crate::state::LongitudePolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Smallest width in pixels the map is fitted to.
pub const MIN_MAP_WIDTH: f64 = 100.0;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Longitude selected at startup
    pub initial_longitude: f64,
    /// Handling of longitudes outside [-180, 180]
    pub longitude_policy: LongitudePolicy,
    /// Map width in pixels (the canvas shrinks it when narrower)
    pub map_width: f64,
    /// Country boundaries (.geojson, .json or .shp); built-in layer when unset
    pub dataset_path: Option<PathBuf>,
    /// Path resampling tolerance in pixels
    pub precision: f64,
    /// Draw meridians and parallels
    pub show_graticule: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_longitude: 0.0,
            longitude_policy: LongitudePolicy::default(),
            map_width: 1200.0,
            dataset_path: None,
            precision: DEFAULT_PRECISION,
            show_graticule: true,
        }
    }
}

impl AppConfig {
    /// Applies command line overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(longitude) = args.longitude {
            self.initial_longitude = longitude;
        }
        if let Some(policy) = args.policy {
            self.longitude_policy = policy;
        }
        if let Some(ref dataset) = args.dataset {
            self.dataset_path = Some(dataset.clone());
        }
        if args.no_graticule {
            self.show_graticule = false;
        }
    }

    /// Checks values that would make the map unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.map_width.is_finite() || self.map_width < MIN_MAP_WIDTH {
            return Err(ConfigError::Invalid {
                field: "map_width",
                reason: format!(
                    "{} is below the {} px minimum",
                    self.map_width, MIN_MAP_WIDTH
                ),
            });
        }
        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "precision",
                reason: format!("{} must be a positive number of pixels", self.precision),
            });
        }
        if !self.initial_longitude.is_finite() {
            return Err(ConfigError::Invalid {
                field: "initial_longitude",
                reason: "must be a finite number".to_string(),
            });
        }
        Ok(())
    }
}

/// Get the configuration directory
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "meridian-workbench", "meridian-workbench")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the default configuration file path
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Load configuration from `path`
///
/// Returns `None` if the file doesn't exist yet.
/// Returns an error if the file exists but can't be parsed or is invalid.
pub fn load_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(Some(config))
}

/// Save configuration to `path`
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Resolves the effective configuration: file (explicit or default
/// location), then command line overrides. Problems with the file are
/// logged and fall back to defaults.
pub fn resolve(args: &Args) -> AppConfig {
    let path = args.config.clone().or_else(config_path);

    let mut config = match path.as_deref() {
        Some(path) => match load_config(path) {
            Ok(Some(config)) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Ok(None) => {
                log::info!("No config at {}, using defaults", path.display());
                AppConfig::default()
            }
            Err(e) => {
                log::warn!("Failed to load config from {}: {}", path.display(), e);
                AppConfig::default()
            }
        },
        None => {
            log::warn!("{}, using defaults", ConfigError::NoConfigDir);
            AppConfig::default()
        }
    };

    config.apply_args(args);
    if let Err(e) = config.validate() {
        log::warn!("{}; using defaults", e);
        config = AppConfig::default();
        config.apply_args(args);
    }
    config
}
