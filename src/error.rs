use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Longitude error: {0}")]
    Longitude(#[from] LongitudeError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Window error: {0}")]
    Eframe(#[from] eframe::Error),
}

/// Rejected longitude input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LongitudeError {
    #[error("longitude is not a finite number")]
    NonFinite,

    #[error("longitude {0} is outside [-180, 180]")]
    OutOfRange(f64),
}

/// Geographic dataset loading errors
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON parsing failed: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Shapefile parsing failed: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error("Dataset contains no drawable features")]
    Empty,
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type alias for application operations
pub type Result<T> = std::result::Result<T, AppError>;
