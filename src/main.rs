#![warn(clippy::all)]

//! Meridian Workbench - longitude-based solar time on an interactive world map.
//!
//! Pick a longitude with the slider, the numeric field or by clicking the
//! map, and read off its local solar time and UTC offset. The map is a
//! Miller projection of an optional country-boundary dataset.

mod cli;
mod config;
mod error;
mod export;
mod geo;
mod solar;
mod state;
mod ui;

use clap::Parser;
use cli::Args;
use config::AppConfig;
use eframe::egui;
use error::{DatasetError, Result};
use geo::{GeoLayer, GeoLayerKind};
use state::AppState;
use std::sync::Arc;

/// Country boundaries shipped with the binary.
static COUNTRIES_GEOJSON: &str = include_str!("../assets/countries-110m.geojson");
const BUILTIN_DATASET_NAME: &str = "Natural Earth 1:110m";

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    log::info!("meridian-workbench v{} starting", env!("CARGO_PKG_VERSION"));

    let config = config::resolve(&args);
    if args.write_config {
        write_config(&args, &config);
    }

    let dataset = load_countries(&config);

    if let Some(ref path) = args.export_svg {
        let countries = dataset.as_ref().map(|d| d.layer.as_ref());
        return export::export_svg(&config, countries, path);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Meridian Workbench")
            .with_inner_size([config.map_width as f32 + 300.0, 960.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Meridian Workbench",
        native_options,
        Box::new(move |cc| Ok(Box::new(MeridianApp::new(cc, &config, dataset)))),
    )?;

    log::info!("meridian-workbench shutdown complete");
    Ok(())
}

/// Initialize logging, honouring `RUST_LOG` when set.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Saves the effective settings where they were (or would be) loaded from.
fn write_config(args: &Args, config: &AppConfig) {
    let Some(path) = args.config.clone().or_else(config::config_path) else {
        log::warn!("Not saving settings: {}", error::ConfigError::NoConfigDir);
        return;
    };

    match config::save_config(&path, config) {
        Ok(()) => log::info!("Saved settings to {}", path.display()),
        Err(e) => log::warn!("Failed to save settings to {}: {}", path.display(), e),
    }
}

/// A loaded country layer and the name shown in the attribution.
pub struct Dataset {
    layer: Arc<GeoLayer>,
    name: String,
}

/// Loads the configured country layer, falling back to the built-in one.
fn load_countries(config: &AppConfig) -> Option<Dataset> {
    if let Some(path) = config.dataset_path.as_deref() {
        match GeoLayer::load_from_path(GeoLayerKind::Countries, path) {
            Ok(layer) => {
                log::info!(
                    "Loaded {} country features from {}",
                    layer.features.len(),
                    path.display()
                );
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                return Some(Dataset {
                    layer: Arc::new(layer),
                    name,
                });
            }
            Err(e) => log::error!(
                "Failed to load {}: {}; using built-in countries",
                path.display(),
                e
            ),
        }
    }

    match load_builtin_countries() {
        Ok(layer) => {
            log::info!("Loaded {} built-in country features", layer.features.len());
            Some(Dataset {
                layer: Arc::new(layer),
                name: BUILTIN_DATASET_NAME.to_string(),
            })
        }
        Err(e) => {
            log::error!("Failed to load built-in countries: {}; drawing outline only", e);
            None
        }
    }
}

fn load_builtin_countries() -> std::result::Result<GeoLayer, DatasetError> {
    let mut layer = GeoLayer::new(GeoLayerKind::Countries);
    layer.load_from_geojson(COUNTRIES_GEOJSON)?;
    if layer.features.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(layer)
}

/// Main application state and logic.
pub struct MeridianApp {
    /// Selection and display toggles
    state: AppState,

    /// Map layers and derived caches
    map: ui::MapView,

    /// Name of the loaded dataset, for attribution
    dataset_name: Option<String>,
}

impl MeridianApp {
    /// Creates a new MeridianApp instance.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        dataset: Option<Dataset>,
    ) -> Self {
        let (countries, dataset_name) = match dataset {
            Some(Dataset { layer, name }) => (Some(layer), Some(name)),
            None => (None, None),
        };

        Self {
            state: AppState::from_config(config),
            map: ui::MapView::new(countries, config.map_width, config.precision),
            dataset_name,
        }
    }
}

impl eframe::App for MeridianApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::render_top_bar(ctx, &self.state);
        ui::render_longitude_panel(ctx, &mut self.state, self.dataset_name.as_deref());
        ui::render_canvas(ctx, &mut self.state, &mut self.map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_builtin_countries_load() {
        let layer = load_builtin_countries().unwrap();
        assert!(layer.features.len() > 150);
        assert!(layer
            .features
            .iter()
            .any(|feature| feature.label() == Some("Fiji")));
    }

    #[test]
    fn test_default_config_uses_builtin_countries() {
        let dataset = load_countries(&AppConfig::default()).unwrap();
        assert_eq!(dataset.name, BUILTIN_DATASET_NAME);
        assert!(!dataset.layer.features.is_empty());
    }

    #[test]
    fn test_unreadable_dataset_falls_back_to_builtin() {
        let config = AppConfig {
            dataset_path: Some(PathBuf::from("/nonexistent/countries.geojson")),
            ..Default::default()
        };
        let dataset = load_countries(&config).unwrap();
        assert_eq!(dataset.name, BUILTIN_DATASET_NAME);
    }

    #[test]
    fn test_configured_dataset_is_named_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("islands.geojson");
        std::fs::write(
            &path,
            r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}"#,
        )
        .unwrap();

        let config = AppConfig {
            dataset_path: Some(path),
            ..Default::default()
        };
        let dataset = load_countries(&config).unwrap();
        assert_eq!(dataset.name, "islands.geojson");
        assert_eq!(dataset.layer.features.len(), 1);
    }
}
