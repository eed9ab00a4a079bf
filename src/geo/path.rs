//! Projection of geographic features into drawable pixel-space paths.
//!
//! Segments are adaptively resampled so that curved projected edges stay
//! within the projection's precision, and rings are split where they jump
//! across the antimeridian instead of streaking across the whole map.

use super::{GeoFeature, GeoLayer, Projection};
use eframe::egui::Pos2;
use geo_types::Coord;
use std::fmt::Write as _;

/// Maximum subdivision depth per segment.
const MAX_RESAMPLE_DEPTH: u32 = 16;

/// A connected run of projected points.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPart {
    pub points: Vec<Pos2>,
    /// Whether the last point joins back to the first
    pub closed: bool,
}

/// One projected feature, ready to draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapPath {
    pub parts: Vec<PathPart>,
    pub label: Option<String>,
}

impl MapPath {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the path as SVG path data (`M x,y L x,y ... Z`).
    pub fn svg_path_data(&self) -> String {
        let mut data = String::new();
        for part in &self.parts {
            for (i, p) in part.points.iter().enumerate() {
                let command = if i == 0 { 'M' } else { 'L' };
                let _ = write!(data, "{}{:.2},{:.2}", command, p.x, p.y);
            }
            if part.closed {
                data.push('Z');
            }
        }
        data
    }
}

/// Projects every feature of a layer, dropping features with nothing visible.
pub fn project_layer<P: Projection + ?Sized>(projection: &P, layer: &GeoLayer) -> Vec<MapPath> {
    layer
        .features
        .iter()
        .map(|feature| project_feature(projection, feature))
        .filter(|path| !path.is_empty())
        .collect()
}

/// Projects a single feature.
pub fn project_feature<P: Projection + ?Sized>(projection: &P, feature: &GeoFeature) -> MapPath {
    let mut path = MapPath {
        parts: Vec::new(),
        label: feature.label().map(str::to_string),
    };

    match feature {
        GeoFeature::LineString(coords) => {
            path.parts.extend(project_line(projection, coords, false));
        }
        GeoFeature::MultiLineString(lines) => {
            for coords in lines {
                path.parts.extend(project_line(projection, coords, false));
            }
        }
        GeoFeature::Polygon {
            exterior, holes, ..
        } => {
            path.parts.extend(project_line(projection, exterior, true));
            for hole in holes {
                path.parts.extend(project_line(projection, hole, true));
            }
        }
        GeoFeature::MultiPolygon { polygons, .. } => {
            for (exterior, holes) in polygons {
                path.parts.extend(project_line(projection, exterior, true));
                for hole in holes {
                    path.parts.extend(project_line(projection, hole, true));
                }
            }
        }
    }

    path
}

/// Projects a polyline or ring into one or more connected parts.
///
/// Segments spanning more than 180° of longitude take the short way across
/// the antimeridian: they are cut where they meet ±180°, ending one part at
/// that map edge and starting the next at the opposite edge.
fn project_line<P: Projection + ?Sized>(
    projection: &P,
    coords: &[Coord<f64>],
    ring: bool,
) -> Vec<PathPart> {
    let mut parts = Vec::new();
    let mut current: Vec<Pos2> = Vec::new();
    let mut previous: Option<(Coord<f64>, Pos2)> = None;
    let mut gap = false;
    let mut crossings = 0;

    for &coord in coords {
        let Some(pos) = projection.project(coord) else {
            flush(&mut parts, &mut current);
            previous = None;
            gap = true;
            continue;
        };

        match previous {
            Some((prev_coord, prev_pos)) if (coord.x - prev_coord.x).abs() > 180.0 => {
                let (near, far) = antimeridian_crossing(prev_coord, coord);
                match (projection.project(near), projection.project(far)) {
                    (Some(near_pos), Some(far_pos)) => {
                        resample(
                            projection,
                            (prev_coord, prev_pos),
                            (near, near_pos),
                            MAX_RESAMPLE_DEPTH,
                            &mut current,
                        );
                        flush(&mut parts, &mut current);
                        current.push(far_pos);
                        resample(
                            projection,
                            (far, far_pos),
                            (coord, pos),
                            MAX_RESAMPLE_DEPTH,
                            &mut current,
                        );
                    }
                    _ => {
                        flush(&mut parts, &mut current);
                        current.push(pos);
                    }
                }
                crossings += 1;
            }
            Some((prev_coord, prev_pos)) => {
                resample(
                    projection,
                    (prev_coord, prev_pos),
                    (coord, pos),
                    MAX_RESAMPLE_DEPTH,
                    &mut current,
                );
            }
            None => current.push(pos),
        }
        previous = Some((coord, pos));
    }
    flush(&mut parts, &mut current);

    if ring && !gap {
        if crossings == 0 {
            if let Some(part) = parts.first_mut() {
                // Drop the explicit closing point; `closed` draws that edge
                if part.points.len() > 2 && part.points.first() == part.points.last() {
                    part.points.pop();
                }
                part.closed = true;
            }
        } else if parts.len() >= 2 && coords.first() == coords.last() {
            // The ring's start lies inside a part; rejoin its two halves
            let head = parts.remove(0);
            if let Some(tail) = parts.last_mut() {
                tail.points.extend(head.points.into_iter().skip(1));
            }
        }
    }

    parts
}

/// Splits a segment that crosses the antimeridian into the point where it
/// leaves the map on `a`'s side and the matching point on the far side.
/// Latitude is interpolated linearly in longitude.
fn antimeridian_crossing(a: Coord<f64>, b: Coord<f64>) -> (Coord<f64>, Coord<f64>) {
    let edge = if a.x > b.x { 180.0 } else { -180.0 };
    let unwrapped = b.x + 2.0 * edge;
    let t = (edge - a.x) / (unwrapped - a.x);
    let lat = a.y + t * (b.y - a.y);
    (Coord { x: edge, y: lat }, Coord { x: -edge, y: lat })
}

fn flush(parts: &mut Vec<PathPart>, current: &mut Vec<Pos2>) {
    if current.len() >= 2 {
        parts.push(PathPart {
            points: std::mem::take(current),
            closed: false,
        });
    } else {
        current.clear();
    }
}

/// Appends `b` to `out`, inserting midpoints while the projected midpoint
/// strays from the straight pixel chord by more than the precision.
fn resample<P: Projection + ?Sized>(
    projection: &P,
    a: (Coord<f64>, Pos2),
    b: (Coord<f64>, Pos2),
    depth: u32,
    out: &mut Vec<Pos2>,
) {
    let precision_sq = (projection.precision() * projection.precision()) as f32;
    let chord = b.1 - a.1;

    if depth > 0 && chord.length_sq() > 4.0 * precision_sq {
        let mid_coord = Coord {
            x: (a.0.x + b.0.x) / 2.0,
            y: (a.0.y + b.0.y) / 2.0,
        };
        if let Some(mid_pos) = projection.project(mid_coord) {
            // Squared perpendicular distance from the midpoint to the chord
            let offset = mid_pos - a.1;
            let cross = offset.x * chord.y - offset.y * chord.x;
            if cross * cross / chord.length_sq() > precision_sq {
                resample(projection, a, (mid_coord, mid_pos), depth - 1, out);
                resample(projection, (mid_coord, mid_pos), b, depth - 1, out);
                return;
            }
        }
    }

    out.push(b.1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoLayerKind, MillerProjection, DEFAULT_PRECISION};

    fn projection() -> MillerProjection {
        MillerProjection::fit_width(1200.0, DEFAULT_PRECISION)
    }

    fn coords(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn test_square_polygon_is_one_closed_part() {
        let feature = GeoFeature::Polygon {
            exterior: coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            holes: Vec::new(),
            label: Some("Squareland".to_string()),
        };

        let path = project_feature(&projection(), &feature);
        assert_eq!(path.parts.len(), 1);
        assert!(path.parts[0].closed);
        assert_eq!(path.label.as_deref(), Some("Squareland"));
        assert!(path.parts[0].points.len() >= 4);
    }

    #[test]
    fn test_meridian_and_parallel_need_no_resampling() {
        // Miller maps meridians and parallels to straight lines
        let p = projection();
        let meridian = GeoFeature::LineString(coords(&[(30.0, -80.0), (30.0, 80.0)]));
        let path = project_feature(&p, &meridian);
        assert_eq!(path.parts.len(), 1);
        assert_eq!(path.parts[0].points.len(), 2);
        assert!(!path.parts[0].closed);
    }

    #[test]
    fn test_diagonal_segment_is_resampled() {
        let p = projection();
        let diagonal = GeoFeature::LineString(coords(&[(0.0, 0.0), (40.0, 80.0)]));
        let path = project_feature(&p, &diagonal);
        assert_eq!(path.parts.len(), 1);
        assert!(path.parts[0].points.len() > 2);

        // Every inserted point lies on the projected curve
        for point in &path.parts[0].points {
            let coord = p.inverse(*point).unwrap();
            let expected = p.forward(coord.x, coord.x * 2.0).unwrap();
            assert!((expected.y - point.y).abs() < 1.0);
        }
    }

    #[test]
    fn test_antimeridian_segment_is_cut_at_map_edges() {
        let p = projection();
        let crossing = GeoFeature::LineString(coords(&[(-170.0, 0.0), (170.0, 80.0)]));
        let path = project_feature(&p, &crossing);
        assert_eq!(path.parts.len(), 2);

        // Going west from -170 reaches the edge halfway along, at 40°N
        let west = &path.parts[0];
        let east = &path.parts[1];
        let west_edge = p.forward(-180.0, 40.0).unwrap();
        let east_edge = p.forward(180.0, 40.0).unwrap();
        assert_eq!(west.points.first(), p.forward(-170.0, 0.0).as_ref());
        assert!((*west.points.last().unwrap() - west_edge).length() < 1e-3);
        assert!((*east.points.first().unwrap() - east_edge).length() < 1e-3);
        assert_eq!(east.points.last(), p.forward(170.0, 80.0).as_ref());

        // Both halves are resampled and stay on the interpolated line
        assert!(west.points.len() > 2);
        assert!(east.points.len() > 2);
        for point in &west.points {
            let coord = p.inverse(*point).unwrap();
            let expected = p.forward(coord.x, (-170.0 - coord.x) * 4.0).unwrap();
            assert!((expected.y - point.y).abs() < 1.0);
        }
        for point in &east.points {
            let coord = p.inverse(*point).unwrap();
            let expected = p.forward(coord.x, 40.0 + (180.0 - coord.x) * 4.0).unwrap();
            assert!((expected.y - point.y).abs() < 1.0);
        }
    }

    #[test]
    fn test_antimeridian_crossing_splits_ring() {
        let ring = GeoFeature::Polygon {
            exterior: coords(&[
                (170.0, 60.0),
                (-170.0, 60.0),
                (-170.0, 70.0),
                (170.0, 70.0),
                (170.0, 60.0),
            ]),
            holes: Vec::new(),
            label: None,
        };

        let p = projection();
        let path = project_feature(&p, &ring);
        assert_eq!(path.parts.len(), 2);
        assert!(path.parts.iter().all(|part| !part.closed));

        // Each half starts and ends on the outline edge of its own side
        let outline = p.outline_rect();
        for part in &path.parts {
            let first = part.points.first().unwrap();
            let last = part.points.last().unwrap();
            assert!((first.x - last.x).abs() < 1e-3);
            assert!(
                (first.x - outline.left()).abs() < 1e-3
                    || (first.x - outline.right()).abs() < 1e-3
            );
        }
        for part in &path.parts {
            let xs: Vec<f32> = part.points.iter().map(|p| p.x).collect();
            let span = xs.iter().cloned().fold(f32::MIN, f32::max)
                - xs.iter().cloned().fold(f32::MAX, f32::min);
            assert!(span < 100.0, "part spans {} px", span);
        }
    }

    #[test]
    fn test_svg_path_data() {
        let path = MapPath {
            parts: vec![PathPart {
                points: vec![Pos2::new(1.0, 2.0), Pos2::new(3.5, 4.25), Pos2::new(5.0, 2.0)],
                closed: true,
            }],
            label: None,
        };
        assert_eq!(path.svg_path_data(), "M1.00,2.00L3.50,4.25L5.00,2.00Z");
    }

    #[test]
    fn test_project_layer_drops_empty_paths() {
        let mut layer = GeoLayer::new(GeoLayerKind::Countries);
        layer.features.push(GeoFeature::LineString(coords(&[(0.0, 0.0)])));
        layer
            .features
            .push(GeoFeature::LineString(coords(&[(0.0, 0.0), (5.0, 5.0)])));

        let paths = project_layer(&projection(), &layer);
        assert_eq!(paths.len(), 1);
    }
}
