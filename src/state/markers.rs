//! Memoized values derived from the selection and the projection.
//!
//! Everything here is a pure function of its key, so a cached value is
//! reused until the key changes.

use crate::geo::{project_layer, GeoLayer, MapPath, Projection, ProjectionId};

/// Horizontal positions of the longitude marker lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerLayout {
    /// X of the selected-longitude line, if it projects
    pub selected_x: Option<f32>,
    /// X of the hover line, if there is a hover longitude and it projects
    pub hover_x: Option<f32>,
}

impl MarkerLayout {
    /// Forward-projects `(longitude, 0)` for each marker.
    pub fn compute<P: Projection + ?Sized>(
        projection: &P,
        selected: f64,
        hover: Option<f64>,
    ) -> Self {
        Self {
            selected_x: projection.forward(selected, 0.0).map(|p| p.x),
            hover_x: hover
                .and_then(|lon| projection.forward(lon, 0.0))
                .map(|p| p.x),
        }
    }
}

/// Cache key for a marker layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerKey {
    selected_bits: u64,
    hover_bits: Option<u64>,
    projection: ProjectionId,
}

impl MarkerKey {
    pub fn new(selected: f64, hover: Option<f64>, projection: ProjectionId) -> Self {
        Self {
            selected_bits: selected.to_bits(),
            hover_bits: hover.map(f64::to_bits),
            projection,
        }
    }
}

/// Single-entry cache for the marker layout.
#[derive(Default)]
pub struct MarkerCache {
    entry: Option<(MarkerKey, MarkerLayout)>,
}

impl MarkerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the layout for the inputs, recomputing only on a key change.
    pub fn get<P: Projection + ?Sized>(
        &mut self,
        projection: &P,
        selected: f64,
        hover: Option<f64>,
    ) -> MarkerLayout {
        let key = MarkerKey::new(selected, hover, projection.identity());
        match self.entry {
            Some((cached_key, layout)) if cached_key == key => layout,
            _ => {
                let layout = MarkerLayout::compute(projection, selected, hover);
                self.entry = Some((key, layout));
                layout
            }
        }
    }
}

/// Projected map paths for one layer, rebuilt when the projection changes.
///
/// The layer itself is immutable, so the projection is the whole key.
pub struct PathCache {
    projection: Option<ProjectionId>,
    paths: Vec<MapPath>,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PathCache {
    pub fn new() -> Self {
        Self {
            projection: None,
            paths: Vec::new(),
        }
    }

    /// Returns the paths for `layer` under `projection`.
    pub fn get<P: Projection + ?Sized>(&mut self, projection: &P, layer: &GeoLayer) -> &[MapPath] {
        let id = projection.identity();
        if self.projection != Some(id) {
            self.paths = project_layer(projection, layer);
            self.projection = Some(id);
            log::debug!(
                "Projected {} {:?} paths for projection {:?}",
                self.paths.len(),
                layer.kind,
                id
            );
        }
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{graticule, MillerProjection, DEFAULT_PRECISION};
    use eframe::egui::Pos2;
    use geo_types::Coord;
    use std::cell::Cell;

    /// Wraps a projection and counts forward calls.
    struct CountingProjection {
        inner: MillerProjection,
        forward_calls: Cell<usize>,
    }

    impl CountingProjection {
        fn new(width: f64) -> Self {
            Self {
                inner: MillerProjection::fit_width(width, DEFAULT_PRECISION),
                forward_calls: Cell::new(0),
            }
        }
    }

    impl Projection for CountingProjection {
        fn forward(&self, lon: f64, lat: f64) -> Option<Pos2> {
            self.forward_calls.set(self.forward_calls.get() + 1);
            self.inner.forward(lon, lat)
        }

        fn inverse(&self, pos: Pos2) -> Option<Coord<f64>> {
            self.inner.inverse(pos)
        }

        fn identity(&self) -> ProjectionId {
            self.inner.identity()
        }

        fn precision(&self) -> f64 {
            self.inner.precision()
        }
    }

    #[test]
    fn test_layout_positions() {
        let p = MillerProjection::fit_width(1200.0, DEFAULT_PRECISION);
        let layout = MarkerLayout::compute(&p, 0.0, None);
        assert!((layout.selected_x.unwrap() - 600.0).abs() < 1e-3);
        assert_eq!(layout.hover_x, None);

        let layout = MarkerLayout::compute(&p, 0.0, Some(90.0));
        assert!(layout.hover_x.unwrap() > layout.selected_x.unwrap());
    }

    #[test]
    fn test_marker_cache_reuses_layout() {
        let p = CountingProjection::new(1200.0);
        let mut cache = MarkerCache::new();

        let first = cache.get(&p, 42.7, Some(10.0));
        let calls = p.forward_calls.get();
        assert_eq!(calls, 2);

        let second = cache.get(&p, 42.7, Some(10.0));
        assert_eq!(first, second);
        assert_eq!(p.forward_calls.get(), calls);

        cache.get(&p, 42.7, None);
        assert_eq!(p.forward_calls.get(), calls + 1);
        cache.get(&p, 42.7, None);
        assert_eq!(p.forward_calls.get(), calls + 1);
    }

    #[test]
    fn test_marker_cache_tracks_projection() {
        let mut cache = MarkerCache::new();
        let narrow = MillerProjection::fit_width(600.0, DEFAULT_PRECISION);
        let wide = MillerProjection::fit_width(1200.0, DEFAULT_PRECISION);

        let a = cache.get(&narrow, 0.0, None);
        let b = cache.get(&wide, 0.0, None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_path_cache_rebuilds_on_projection_change() {
        let layer = graticule(15.0, 30.0);
        let mut cache = PathCache::new();

        let p = CountingProjection::new(1200.0);
        let count = cache.get(&p, &layer).len();
        assert_eq!(count, layer.features.len());
        let calls = p.forward_calls.get();

        cache.get(&p, &layer);
        assert_eq!(p.forward_calls.get(), calls);

        let other = CountingProjection::new(800.0);
        cache.get(&other, &layer);
        assert!(other.forward_calls.get() > 0);

        // Only the latest projection is kept
        let before_return = p.forward_calls.get();
        cache.get(&p, &layer);
        assert!(p.forward_calls.get() > before_return);
    }
}
