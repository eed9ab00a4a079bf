//! Geographic layer rendering.
//!
//! Paints projected paths onto the egui canvas. Paths are stored relative to
//! the canvas's top-left corner and shifted by `origin` when drawn.

use super::{MapPath, MillerProjection, Projection};
use crate::solar::compute_solar_time;
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke, Vec2};

/// Renders a set of projected paths as strokes.
pub fn render_paths(painter: &Painter, paths: &[MapPath], origin: Pos2, stroke: Stroke) {
    let offset = origin.to_vec2();

    for path in paths {
        for part in &path.parts {
            let points: Vec<Pos2> = part.points.iter().map(|p| *p + offset).collect();
            if part.closed {
                painter.add(Shape::closed_line(points, stroke));
            } else {
                painter.add(Shape::line(points, stroke));
            }
        }
    }
}

/// Renders the filled sphere outline behind the map.
pub fn render_outline(
    painter: &Painter,
    projection: &MillerProjection,
    origin: Pos2,
    fill: Color32,
    stroke: Stroke,
) {
    let rect = projection.outline_rect().translate(origin.to_vec2());
    painter.rect_filled(rect, 0.0, fill);
    painter.line_segment([rect.left_top(), rect.right_top()], stroke);
    painter.line_segment([rect.right_top(), rect.right_bottom()], stroke);
    painter.line_segment([rect.right_bottom(), rect.left_bottom()], stroke);
    painter.line_segment([rect.left_bottom(), rect.left_top()], stroke);
}

/// Labels each hour meridian with its solar time along the top edge.
pub fn render_hour_labels(
    painter: &Painter,
    projection: &MillerProjection,
    origin: Pos2,
    color: Color32,
) {
    let top = projection.outline_rect().min.y;

    // Skip the ±180 ends, which would sit on the outline
    for step in -11..=11 {
        let longitude = step as f64 * 15.0;
        let Some(pos) = projection.forward(longitude, 0.0) else {
            continue;
        };
        let time = compute_solar_time(longitude);
        painter.text(
            Pos2::new(pos.x, top) + origin.to_vec2() + Vec2::new(0.0, 4.0),
            Align2::CENTER_TOP,
            format!("{:02}h", time.hours),
            FontId::monospace(10.0),
            color,
        );
    }
}
