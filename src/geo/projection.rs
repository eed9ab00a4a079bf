//! Map projection and coordinate transformation.
//!
//! Converts between geographic coordinates (lon, lat in degrees) and pixel
//! positions on the map canvas. Pixel positions are relative to the
//! canvas's top-left corner; the canvas adds its own screen origin.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;
use std::collections::hash_map::DefaultHasher;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::hash::{Hash, Hasher};

/// Default resampling tolerance in pixels.
pub const DEFAULT_PRECISION: f64 = 0.2;

/// Identity of a projection configuration.
///
/// Two projections with the same id map every coordinate identically, so
/// anything derived from one may be reused for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectionId(pub u64);

/// A forward/inverse mapping between geographic and pixel coordinates.
pub trait Projection {
    /// Geographic (lon, lat) in degrees to a pixel position.
    ///
    /// Returns `None` for non-finite input or latitudes beyond the poles.
    fn forward(&self, lon: f64, lat: f64) -> Option<Pos2>;

    /// Pixel position to geographic coordinates.
    ///
    /// Returns `None` when the position lies outside the map outline.
    fn inverse(&self, pos: Pos2) -> Option<Coord<f64>>;

    /// Stable identity used as a cache key.
    fn identity(&self) -> ProjectionId;

    /// Resampling tolerance in pixels for path rendering.
    fn precision(&self) -> f64;

    /// Projects a geographic coordinate.
    fn project(&self, coord: Coord<f64>) -> Option<Pos2> {
        self.forward(coord.x, coord.y)
    }
}

/// Miller cylindrical projection, fitted to a target width.
///
/// Fitting follows the usual "fit the sphere to the width" approach and
/// then shrinks the scale by `(l - 1) / l` so the outline's stroke is not
/// clipped at the canvas edge.
#[derive(Debug, Clone, PartialEq)]
pub struct MillerProjection {
    /// Pixels per radian
    scale: f64,
    /// Pixel position of (0°, 0°)
    translate: (f64, f64),
    /// Resampling tolerance in pixels
    precision: f64,
    /// Fitted canvas size in pixels
    size: Vec2,
}

impl MillerProjection {
    /// Fits the projection so the full sphere spans `width` pixels.
    pub fn fit_width(width: f64, precision: f64) -> Self {
        let width = width.max(2.0);
        let fitted_scale = width / (2.0 * PI);
        let y_extent = miller_y(FRAC_PI_2);

        let translate = (width / 2.0, fitted_scale * y_extent);
        let height = (2.0 * fitted_scale * y_extent).ceil();

        let l = width.ceil().min(height);
        let scale = fitted_scale * (l - 1.0) / l;

        Self {
            scale,
            translate,
            precision,
            size: Vec2::new(width as f32, height as f32),
        }
    }

    /// Fitted canvas size in pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Pixels per radian.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pixel-space bounds of the sphere outline.
    pub fn outline_rect(&self) -> Rect {
        let half_w = self.scale * PI;
        let half_h = self.scale * miller_y(FRAC_PI_2);
        let (tx, ty) = self.translate;
        Rect::from_min_max(
            Pos2::new((tx - half_w) as f32, (ty - half_h) as f32),
            Pos2::new((tx + half_w) as f32, (ty + half_h) as f32),
        )
    }
}

impl Projection for MillerProjection {
    fn forward(&self, lon: f64, lat: f64) -> Option<Pos2> {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
            return None;
        }

        let x = lon.to_radians();
        let y = miller_y(lat.to_radians());
        if !y.is_finite() {
            return None;
        }

        let (tx, ty) = self.translate;
        Some(Pos2::new(
            (tx + self.scale * x) as f32,
            (ty - self.scale * y) as f32,
        ))
    }

    fn inverse(&self, pos: Pos2) -> Option<Coord<f64>> {
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return None;
        }

        let (tx, ty) = self.translate;
        let x = (pos.x as f64 - tx) / self.scale;
        let y = (ty - pos.y as f64) / self.scale;

        // Outline test with a small allowance for f32 pixel rounding
        let slack = 1e-6;
        if x.abs() > PI + slack || y.abs() > miller_y(FRAC_PI_2) + slack {
            return None;
        }

        let lon = x.to_degrees().clamp(-180.0, 180.0);
        let lat = miller_lat(y).to_degrees().clamp(-90.0, 90.0);
        Some(Coord { x: lon, y: lat })
    }

    fn identity(&self) -> ProjectionId {
        let mut hasher = DefaultHasher::new();
        "miller".hash(&mut hasher);
        self.scale.to_bits().hash(&mut hasher);
        self.translate.0.to_bits().hash(&mut hasher);
        self.translate.1.to_bits().hash(&mut hasher);
        self.precision.to_bits().hash(&mut hasher);
        ProjectionId(hasher.finish())
    }

    fn precision(&self) -> f64 {
        self.precision
    }
}

/// Miller raw y for a latitude in radians.
fn miller_y(phi: f64) -> f64 {
    1.25 * (FRAC_PI_4 + 0.4 * phi).tan().ln()
}

/// Inverse of [`miller_y`], returning latitude in radians.
fn miller_lat(y: f64) -> f64 {
    2.5 * (0.8 * y).exp().atan() - 0.625 * PI
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> MillerProjection {
        MillerProjection::fit_width(1200.0, DEFAULT_PRECISION)
    }

    #[test]
    fn test_fit_dimensions() {
        let p = projection();
        assert_eq!(p.size().x, 1200.0);
        assert_eq!(p.size().y, 880.0);

        let outline = p.outline_rect();
        assert!(outline.width() < 1200.0);
        assert!((outline.center().x - 600.0).abs() < 1e-3);
        assert!(outline.min.y > 0.0 && outline.max.y < 880.0);
    }

    #[test]
    fn test_equator_meridian_at_center() {
        let p = projection();
        let pos = p.forward(0.0, 0.0).unwrap();
        assert!((pos.x - 600.0).abs() < 1e-3);
        assert!((pos.y - p.outline_rect().center().y).abs() < 1e-3);
    }

    #[test]
    fn test_east_is_right_north_is_up() {
        let p = projection();
        let origin = p.forward(0.0, 0.0).unwrap();
        let east = p.forward(30.0, 0.0).unwrap();
        let north = p.forward(0.0, 30.0).unwrap();
        assert!(east.x > origin.x);
        assert!(north.y < origin.y);
    }

    #[test]
    fn test_round_trip_along_equator() {
        let p = projection();
        let mut lon = -179.5;
        while lon < 180.0 {
            let pos = p.forward(lon, 0.0).unwrap();
            let coord = p.inverse(pos).unwrap();
            assert!((coord.x - lon).abs() < 1e-2, "lon {} -> {}", lon, coord.x);
            assert!(coord.y.abs() < 1e-2);
            lon += 2.5;
        }
    }

    #[test]
    fn test_round_trip_off_equator() {
        let p = projection();
        for (lon, lat) in [(-73.9, 40.7), (139.7, 35.7), (18.4, -33.9), (0.0, 85.0)] {
            let coord = p.inverse(p.forward(lon, lat).unwrap()).unwrap();
            assert!((coord.x - lon).abs() < 1e-2);
            assert!((coord.y - lat).abs() < 1e-2);
        }
    }

    #[test]
    fn test_inverse_outside_outline() {
        let p = projection();
        let outline = p.outline_rect();
        assert!(p.inverse(Pos2::new(outline.min.x - 2.0, outline.center().y)).is_none());
        assert!(p.inverse(Pos2::new(outline.max.x + 2.0, outline.center().y)).is_none());
        assert!(p.inverse(Pos2::new(600.0, outline.min.y - 2.0)).is_none());
        assert!(p.inverse(Pos2::new(600.0, outline.max.y + 2.0)).is_none());
        assert!(p.inverse(Pos2::new(f32::NAN, 10.0)).is_none());
    }

    #[test]
    fn test_forward_rejects_invalid_input() {
        let p = projection();
        assert!(p.forward(f64::NAN, 0.0).is_none());
        assert!(p.forward(0.0, f64::INFINITY).is_none());
        assert!(p.forward(0.0, 91.0).is_none());
        assert!(p.forward(0.0, 90.0).is_some());
    }

    #[test]
    fn test_identity_tracks_configuration() {
        assert_eq!(projection().identity(), projection().identity());
        assert_ne!(
            projection().identity(),
            MillerProjection::fit_width(800.0, DEFAULT_PRECISION).identity()
        );
        assert_ne!(
            projection().identity(),
            MillerProjection::fit_width(1200.0, 0.5).identity()
        );
    }
}
