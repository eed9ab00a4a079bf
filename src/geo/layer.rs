//! Geographic layer data structures and dataset loading.

use crate::error::DatasetError;
use eframe::egui::Color32;
use geo_types::Coord;
use geojson::{Feature, GeoJson, Geometry, Value};
use shapefile::dbase::FieldValue;
use std::io::Cursor;
use std::path::Path;

/// Attribute names tried, in order, when looking for a feature label.
const LABEL_FIELDS: &[&str] = &["name", "NAME", "Name", "ADMIN", "NAME_LONG"];

/// Kind of geographic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLayerKind {
    /// Country boundaries from the loaded dataset
    Countries,
    /// Meridians and parallels
    Graticule,
}

impl GeoLayerKind {
    /// Returns the default stroke color for this layer kind.
    pub fn default_color(&self) -> Color32 {
        match self {
            GeoLayerKind::Countries => Color32::from_rgb(235, 238, 240),
            GeoLayerKind::Graticule => Color32::from_rgba_unmultiplied(120, 130, 150, 90),
        }
    }

    /// Returns the default stroke width for this layer kind.
    pub fn default_line_width(&self) -> f32 {
        match self {
            GeoLayerKind::Countries => 0.5,
            GeoLayerKind::Graticule => 0.5,
        }
    }
}

/// A ring of (lon, lat) coordinates.
pub type Ring = Vec<Coord<f64>>;

/// A geographic feature that can be projected and drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFeature {
    /// Open polyline (graticule lines, rivers)
    LineString(Ring),
    /// Several open polylines
    MultiLineString(Vec<Ring>),
    /// Closed polygon with holes
    Polygon {
        exterior: Ring,
        holes: Vec<Ring>,
        label: Option<String>,
    },
    /// Several polygons sharing a label (a country with islands)
    MultiPolygon {
        polygons: Vec<(Ring, Vec<Ring>)>,
        label: Option<String>,
    },
}

impl GeoFeature {
    pub fn label(&self) -> Option<&str> {
        match self {
            GeoFeature::Polygon { label, .. } | GeoFeature::MultiPolygon { label, .. } => {
                label.as_deref()
            }
            _ => None,
        }
    }
}

/// An immutable collection of features of one kind.
#[derive(Debug, Clone)]
pub struct GeoLayer {
    pub kind: GeoLayerKind,
    pub features: Vec<GeoFeature>,
}

impl GeoLayer {
    /// Creates a new empty layer.
    pub fn new(kind: GeoLayerKind) -> Self {
        Self {
            kind,
            features: Vec::new(),
        }
    }

    /// Loads a layer from a `.geojson`/`.json` file or a `.shp` file.
    ///
    /// For shapefiles, a sibling `.dbf` is read for feature names when present.
    pub fn load_from_path(kind: GeoLayerKind, path: &Path) -> Result<Self, DatasetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let mut layer = Self::new(kind);
        match extension.as_str() {
            "json" | "geojson" => {
                let contents = std::fs::read_to_string(path)?;
                layer.load_from_geojson(&contents)?;
            }
            "shp" => {
                let shp_bytes = std::fs::read(path)?;
                let dbf_path = path.with_extension("dbf");
                let dbf_bytes = if dbf_path.exists() {
                    Some(std::fs::read(&dbf_path)?)
                } else {
                    log::debug!("No attribute table at {}", dbf_path.display());
                    None
                };
                layer.load_from_shapefile(&shp_bytes, dbf_bytes.as_deref())?;
            }
            other => return Err(DatasetError::UnsupportedFormat(other.to_string())),
        }

        if layer.features.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(layer)
    }

    /// Loads features from GeoJSON text.
    pub fn load_from_geojson(&mut self, geojson_str: &str) -> Result<(), DatasetError> {
        let geojson: GeoJson = match geojson_str.parse() {
            Ok(geojson) => geojson,
            Err(_) if is_topojson(geojson_str) => {
                return Err(DatasetError::UnsupportedFormat(
                    "TopoJSON (convert it to GeoJSON first)".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        match geojson {
            GeoJson::FeatureCollection(fc) => {
                self.features
                    .extend(fc.features.iter().flat_map(convert_feature));
            }
            GeoJson::Feature(f) => {
                self.features.extend(convert_feature(&f));
            }
            GeoJson::Geometry(g) => {
                self.features.extend(convert_geometry(&g, None));
            }
        }

        Ok(())
    }

    /// Loads features from shapefile bytes, with an optional attribute table.
    pub fn load_from_shapefile(
        &mut self,
        shp_bytes: &[u8],
        dbf_bytes: Option<&[u8]>,
    ) -> Result<(), DatasetError> {
        let mut shape_reader = shapefile::ShapeReader::new(Cursor::new(shp_bytes))?;

        let records: Option<Vec<shapefile::dbase::Record>> = dbf_bytes.and_then(|bytes| {
            let read = shapefile::dbase::Reader::new(Cursor::new(bytes))
                .and_then(|mut r: shapefile::dbase::Reader<Cursor<&[u8]>>| r.read());
            match read {
                Ok(records) => Some(records),
                Err(e) => {
                    log::warn!("Ignoring unreadable attribute table: {}", e);
                    None
                }
            }
        });

        for (idx, result) in shape_reader.iter_shapes().enumerate() {
            let shape = result?;
            let label = records
                .as_ref()
                .and_then(|records| records.get(idx))
                .and_then(record_label);

            if let Some(feature) = convert_shape(&shape, label) {
                self.features.push(feature);
            }
        }

        Ok(())
    }
}

/// Builds a graticule: meridians every `meridian_step` degrees and parallels
/// every `parallel_step` degrees.
pub fn graticule(meridian_step: f64, parallel_step: f64) -> GeoLayer {
    let mut layer = GeoLayer::new(GeoLayerKind::Graticule);

    let mut lon = -180.0;
    while lon <= 180.0 {
        layer.features.push(GeoFeature::LineString(vec![
            Coord { x: lon, y: -90.0 },
            Coord { x: lon, y: 90.0 },
        ]));
        lon += meridian_step;
    }

    // Parallels get intermediate vertices so no segment spans the antimeridian
    let mut lat = -90.0 + parallel_step;
    while lat < 90.0 {
        let line = (0..=4)
            .map(|i| Coord {
                x: -180.0 + 90.0 * i as f64,
                y: lat,
            })
            .collect();
        layer.features.push(GeoFeature::LineString(line));
        lat += parallel_step;
    }

    layer
}

fn record_label(record: &shapefile::dbase::Record) -> Option<String> {
    LABEL_FIELDS.iter().find_map(|field| match record.get(*field) {
        Some(FieldValue::Character(Some(s))) => Some(s.trim().to_string()),
        _ => None,
    })
}

fn convert_shape(shape: &shapefile::Shape, label: Option<String>) -> Option<GeoFeature> {
    use shapefile::PolygonRing;

    match shape {
        shapefile::Shape::Polyline(pl) => {
            let mut lines: Vec<Ring> = pl
                .parts()
                .iter()
                .map(|part| points_to_ring(part))
                .collect();
            if lines.len() == 1 {
                lines.pop().map(GeoFeature::LineString)
            } else {
                Some(GeoFeature::MultiLineString(lines))
            }
        }
        shapefile::Shape::Polygon(poly) => {
            // Rings arrive as an outer ring followed by its holes
            let mut polygons: Vec<(Ring, Vec<Ring>)> = Vec::new();
            for ring in poly.rings() {
                match ring {
                    PolygonRing::Outer(points) => {
                        polygons.push((points_to_ring(points), Vec::new()))
                    }
                    PolygonRing::Inner(points) => {
                        if let Some((_, holes)) = polygons.last_mut() {
                            holes.push(points_to_ring(points));
                        }
                    }
                }
            }

            match polygons.len() {
                0 => None,
                1 => {
                    let (exterior, holes) = polygons.remove(0);
                    Some(GeoFeature::Polygon {
                        exterior,
                        holes,
                        label,
                    })
                }
                _ => Some(GeoFeature::MultiPolygon { polygons, label }),
            }
        }
        _ => None,
    }
}

fn points_to_ring(points: &[shapefile::Point]) -> Ring {
    points.iter().map(|p| Coord { x: p.x, y: p.y }).collect()
}

fn is_topojson(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .map(|value| value.get("type").and_then(serde_json::Value::as_str) == Some("Topology"))
        .unwrap_or(false)
}

fn convert_feature(feature: &Feature) -> Vec<GeoFeature> {
    let label = feature.properties.as_ref().and_then(|props| {
        LABEL_FIELDS
            .iter()
            .find_map(|field| props.get(*field).and_then(serde_json::Value::as_str))
            .map(str::to_string)
    });

    feature
        .geometry
        .as_ref()
        .map(|g| convert_geometry(g, label))
        .unwrap_or_default()
}

fn positions_to_ring(positions: &[Vec<f64>]) -> Ring {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect()
}

fn rings_to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<(Ring, Vec<Ring>)> {
    let (exterior, holes) = rings.split_first()?;
    Some((
        positions_to_ring(exterior),
        holes.iter().map(|h| positions_to_ring(h)).collect(),
    ))
}

fn convert_geometry(geometry: &Geometry, label: Option<String>) -> Vec<GeoFeature> {
    match &geometry.value {
        Value::LineString(coords) => vec![GeoFeature::LineString(positions_to_ring(coords))],
        Value::MultiLineString(lines) => vec![GeoFeature::MultiLineString(
            lines.iter().map(|l| positions_to_ring(l)).collect(),
        )],
        Value::Polygon(rings) => rings_to_polygon(rings)
            .map(|(exterior, holes)| GeoFeature::Polygon {
                exterior,
                holes,
                label,
            })
            .into_iter()
            .collect(),
        Value::MultiPolygon(polygons) => {
            let polygons: Vec<(Ring, Vec<Ring>)> =
                polygons.iter().filter_map(|p| rings_to_polygon(p)).collect();
            if polygons.is_empty() {
                return Vec::new();
            }
            vec![GeoFeature::MultiPolygon { polygons, label }]
        }
        Value::GeometryCollection(geometries) => merge_collection(geometries, label),
        // Points carry no outline to draw
        Value::Point(_) | Value::MultiPoint(_) => Vec::new(),
    }
}

/// Folds a geometry collection into one areal and one linear feature.
fn merge_collection(geometries: &[Geometry], label: Option<String>) -> Vec<GeoFeature> {
    let mut polygons = Vec::new();
    let mut lines = Vec::new();
    for feature in geometries.iter().flat_map(|g| convert_geometry(g, None)) {
        match feature {
            GeoFeature::Polygon {
                exterior, holes, ..
            } => polygons.push((exterior, holes)),
            GeoFeature::MultiPolygon { polygons: parts, .. } => polygons.extend(parts),
            GeoFeature::LineString(line) => lines.push(line),
            GeoFeature::MultiLineString(parts) => lines.extend(parts),
        }
    }

    let mut merged = Vec::new();
    if !polygons.is_empty() {
        merged.push(GeoFeature::MultiPolygon { polygons, label });
    }
    if !lines.is_empty() {
        merged.push(GeoFeature::MultiLineString(lines));
    }
    merged
}
