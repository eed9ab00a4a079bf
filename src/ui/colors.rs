//! Centralized color constants for the UI.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for read-out labels.
    pub const LABEL: Color32 = Color32::from_rgb(130, 130, 140);
    /// Brighter color for read-out values.
    pub const VALUE: Color32 = Color32::from_rgb(220, 220, 225);
    /// Status line text.
    pub const STATUS: Color32 = Color32::GRAY;
}

/// Colors for the map canvas.
pub mod map {
    use super::Color32;

    /// Area around the map.
    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 28);
    /// Sphere fill behind the countries.
    pub const SPHERE: Color32 = Color32::from_rgb(38, 50, 56);
    /// Sphere outline.
    pub const OUTLINE: Color32 = Color32::from_rgb(90, 100, 110);
    /// Solar hour labels along the top edge.
    pub const HOUR_LABEL: Color32 = Color32::from_rgb(150, 160, 175);
}

/// Colors for the longitude marker lines.
pub mod marker {
    use super::Color32;

    /// Committed selection.
    pub const SELECTED: Color32 = Color32::from_rgb(230, 50, 50);
    /// Longitude under the pointer, half transparent.
    pub const HOVER: Color32 = Color32::from_rgba_premultiplied(128, 82, 0, 128);
}
