//! Central canvas UI: the world map and longitude markers.

use super::colors;
use crate::geo::{
    graticule, render_hour_labels, render_outline, render_paths, GeoLayer, GeoLayerKind,
    MillerProjection,
};
use crate::config::MIN_MAP_WIDTH;
use crate::state::{AppState, MarkerCache, MarkerLayout, PathCache};
use eframe::egui::{self, Align2, FontId, Painter, Pos2, Rect, Sense, Stroke, Vec2};
use std::sync::Arc;

/// Static map layers plus the caches derived from them.
pub struct MapView {
    countries: Option<Arc<GeoLayer>>,
    graticule: GeoLayer,
    country_paths: PathCache,
    graticule_paths: PathCache,
    markers: MarkerCache,
    max_width: f64,
    precision: f64,
}

impl MapView {
    pub fn new(countries: Option<Arc<GeoLayer>>, max_width: f64, precision: f64) -> Self {
        Self {
            countries,
            graticule: graticule(15.0, 30.0),
            country_paths: PathCache::new(),
            graticule_paths: PathCache::new(),
            markers: MarkerCache::new(),
            max_width,
            precision,
        }
    }

    /// Fits the projection to the configured width, or less if the panel
    /// is narrower.
    pub fn projection_for(&self, available_width: f32) -> MillerProjection {
        let width = self
            .max_width
            .min(available_width as f64)
            .max(MIN_MAP_WIDTH)
            .floor();
        MillerProjection::fit_width(width, self.precision)
    }
}

pub fn render_canvas(ctx: &egui::Context, state: &mut AppState, map: &mut MapView) {
    egui::CentralPanel::default()
        .frame(egui::Frame::central_panel(&ctx.style()).fill(colors::map::BACKGROUND))
        .show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let projection = map.projection_for(ui.available_width());
                let (response, painter) = ui.allocate_painter(projection.size(), Sense::click());
                let origin = response.rect.min;

                draw_map(&painter, state, map, &projection, origin);
                handle_pointer(&response, state, &projection, origin);

                let layout = map.markers.get(
                    &projection,
                    state.selection.selected(),
                    state.selection.hover(),
                );
                draw_markers(&painter, &response.rect, &layout, state);
            });
        });
}

fn draw_map(
    painter: &Painter,
    state: &AppState,
    map: &mut MapView,
    projection: &MillerProjection,
    origin: Pos2,
) {
    render_outline(
        painter,
        projection,
        origin,
        colors::map::SPHERE,
        Stroke::new(1.0, colors::map::OUTLINE),
    );

    if state.show_graticule {
        let kind = map.graticule.kind;
        let paths = map.graticule_paths.get(projection, &map.graticule);
        render_paths(
            painter,
            paths,
            origin,
            Stroke::new(kind.default_line_width(), kind.default_color()),
        );
        render_hour_labels(painter, projection, origin, colors::map::HOUR_LABEL);
    }

    if let Some(countries) = map.countries.as_deref() {
        let paths = map.country_paths.get(projection, countries);
        render_paths(
            painter,
            paths,
            origin,
            Stroke::new(
                GeoLayerKind::Countries.default_line_width(),
                GeoLayerKind::Countries.default_color(),
            ),
        );
    }
}

/// Routes pointer move, leave and click to the selection.
fn handle_pointer(
    response: &egui::Response,
    state: &mut AppState,
    projection: &MillerProjection,
    origin: Pos2,
) {
    match response.hover_pos() {
        Some(pos) => {
            let local = pos - origin;
            state.selection.on_pointer_move(projection, local.x, local.y);
        }
        None => {
            if state.selection.hover().is_some() {
                state.selection.on_pointer_leave();
            }
        }
    }

    if response.clicked() && state.selection.on_map_click() {
        log::info!("Selected longitude {} from map", state.selection.selected());
        state.status_message = "Ready".to_string();
    }
}

fn draw_markers(painter: &Painter, rect: &Rect, layout: &MarkerLayout, state: &AppState) {
    let vertical = |x: f32| {
        [
            Pos2::new(rect.min.x + x, rect.min.y),
            Pos2::new(rect.min.x + x, rect.max.y),
        ]
    };

    if let Some(x) = layout.selected_x {
        painter.line_segment(vertical(x), Stroke::new(1.5, colors::marker::SELECTED));
    }

    if let (Some(x), Some(readout)) = (layout.hover_x, state.selection.hover_readout()) {
        painter.line_segment(vertical(x), Stroke::new(1.0, colors::marker::HOVER));

        // Small time tag beside the hover line, flipped near the right edge
        let anchor = Pos2::new(rect.min.x + x, rect.max.y - 6.0);
        let (align, nudge) = if x > rect.width() - 60.0 {
            (Align2::RIGHT_BOTTOM, Vec2::new(-4.0, 0.0))
        } else {
            (Align2::LEFT_BOTTOM, Vec2::new(4.0, 0.0))
        };
        painter.text(
            anchor + nudge,
            align,
            readout.solar_time.to_string(),
            FontId::monospace(11.0),
            colors::ui::VALUE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::DEFAULT_PRECISION;

    #[test]
    fn test_projection_honours_narrow_configured_width() {
        let map = MapView::new(None, 150.0, DEFAULT_PRECISION);
        assert_eq!(map.projection_for(1000.0).size().x, 150.0);
    }

    #[test]
    fn test_projection_shrinks_to_panel_down_to_minimum() {
        let map = MapView::new(None, 1200.0, DEFAULT_PRECISION);
        assert_eq!(map.projection_for(640.5).size().x, 640.0);
        assert_eq!(map.projection_for(40.0).size().x, MIN_MAP_WIDTH as f32);
    }
}
