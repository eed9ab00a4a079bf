//! Geographic layers, projection and path rendering for the world map.
//!
//! Features are loaded once into immutable [`GeoLayer`]s, projected through
//! a [`Projection`] into pixel-space [`MapPath`]s and painted onto the egui
//! canvas.

mod layer;
mod path;
mod projection;
mod renderer;
mod svg;

pub use layer::{graticule, GeoFeature, GeoLayer, GeoLayerKind};
pub use path::{project_feature, project_layer, MapPath, PathPart};
pub use projection::{MillerProjection, Projection, ProjectionId, DEFAULT_PRECISION};
pub use renderer::{render_hour_labels, render_outline, render_paths};
pub use svg::SvgDocument;
