//! Headless export of the map as an SVG file.

use crate::config::AppConfig;
use crate::error::Result;
use crate::geo::{
    graticule, project_layer, GeoLayer, MapPath, MillerProjection, PathPart, SvgDocument,
};
use crate::solar::{format_longitude, SolarTime};
use crate::state::{LongitudeSelection, MarkerLayout};
use eframe::egui::Pos2;
use std::path::Path;

/// Renders the map at the configured width with the initial longitude
/// marked, and writes it to `path`.
pub fn export_svg(config: &AppConfig, countries: Option<&GeoLayer>, path: &Path) -> Result<()> {
    let svg = render_svg(config, countries)?;
    std::fs::write(path, svg)?;
    log::info!("Wrote map to {}", path.display());
    Ok(())
}

/// Renders the map as an SVG document.
pub fn render_svg(config: &AppConfig, countries: Option<&GeoLayer>) -> Result<String> {
    let selection = LongitudeSelection::new(config.initial_longitude, config.longitude_policy)?;
    let projection = MillerProjection::fit_width(config.map_width, config.precision);
    let mut doc = SvgDocument::new(projection.size());

    doc.add_paths(
        "outline",
        &[outline_path(&projection)],
        "rgb(38, 50, 56)",
        "#5a646e",
        1.0,
    );

    if config.show_graticule {
        let lines = project_layer(&projection, &graticule(15.0, 30.0));
        doc.add_paths("graticule", &lines, "none", "#78829680", 0.5);
    }

    if let Some(countries) = countries {
        let paths = project_layer(&projection, countries);
        doc.add_paths("countries", &paths, "rgb(38, 50, 56)", "#FFFFFF", 0.5);
    }

    let selected = selection.selected();
    let solar_time = SolarTime::try_from_longitude(selected)?;
    let layout = MarkerLayout::compute(&projection, selected, None);
    if let Some(x) = layout.selected_x {
        let title = format!("{}° solar time {}", format_longitude(selected), solar_time);
        doc.add_vertical_line(x, "red", 1.0, Some(&title));
    }

    Ok(doc.finish())
}

fn outline_path(projection: &MillerProjection) -> MapPath {
    let rect = projection.outline_rect();
    MapPath {
        parts: vec![PathPart {
            points: vec![
                rect.left_top(),
                rect.right_top(),
                rect.right_bottom(),
                Pos2::new(rect.min.x, rect.max.y),
            ],
            closed: true,
        }],
        label: None,
    }
}
