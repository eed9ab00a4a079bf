use crate::state::LongitudePolicy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "meridian-workbench")]
#[command(about = "Read longitude-based solar time off an interactive world map")]
#[command(version)]
pub struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Country boundaries to draw (.geojson, .json or .shp)
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Longitude selected at startup, in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Handling of longitudes outside [-180, 180]
    #[arg(long, value_enum)]
    pub policy: Option<LongitudePolicy>,

    /// Hide meridians and parallels
    #[arg(long)]
    pub no_graticule: bool,

    /// Write the map as SVG to this file and exit without opening a window
    #[arg(long, value_name = "FILE")]
    pub export_svg: Option<PathBuf>,

    /// Save the effective settings to the config file before starting
    #[arg(long)]
    pub write_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
