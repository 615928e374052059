use geo::{BoundingRect, Coord, MapCoords, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};

use crate::{types::GeoFeature, MapError};

/// Fixed logical drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self { Self { width: 1280.0, height: 800.0 } }
}

impl Viewport {
    pub fn center(&self) -> Coord<f64> {
        Coord { x: self.width / 2.0, y: self.height / 2.0 }
    }
}

/// Uniform-scale identity projection fit to a viewport.
///
/// Relative shapes are preserved: x and y share one scale factor, and the
/// fitted extent is centered along the axis with slack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    scale: f64,
    translate: Coord<f64>,
    reflect_y: bool,
    viewport: Viewport,
}

impl Projection {
    /// Fit the union of all feature boundaries into the viewport.
    /// `reflect_y` flips latitude-style (y-up) input into screen space (y-down).
    pub fn fit(features: &[GeoFeature], viewport: Viewport, reflect_y: bool) -> Result<Self, MapError> {
        let sign = if reflect_y { -1.0 } else { 1.0 };

        let bounds = features.iter()
            .filter_map(|feature| feature.boundary.bounding_rect())
            .map(|rect| {
                // Reflection swaps min/max on y; Rect::new normalizes corners.
                Rect::new(
                    Coord { x: rect.min().x, y: sign * rect.min().y },
                    Coord { x: rect.max().x, y: sign * rect.max().y },
                )
            })
            .reduce(|a, b| Rect::new(
                Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            ))
            .ok_or(MapError::EmptyGeometry)?;

        // A zero-width extent is still fittable along the other axis.
        let scale = [viewport.width / bounds.width(), viewport.height / bounds.height()]
            .into_iter()
            .filter(|k| k.is_finite() && *k > 0.0)
            .reduce(f64::min)
            .ok_or(MapError::EmptyGeometry)?;

        let translate = Coord {
            x: (viewport.width - scale * (bounds.min().x + bounds.max().x)) / 2.0,
            y: (viewport.height - scale * (bounds.min().y + bounds.max().y)) / 2.0,
        };

        Ok(Self { scale, translate, reflect_y, viewport })
    }

    pub fn viewport(&self) -> Viewport { self.viewport }

    pub fn scale(&self) -> f64 { self.scale }

    /// Geographic coordinate → screen coordinate.
    #[inline]
    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        let y = if self.reflect_y { -coord.y } else { coord.y };
        Coord {
            x: self.scale * coord.x + self.translate.x,
            y: self.scale * y + self.translate.y,
        }
    }

    /// Screen-space geometry of a feature.
    pub fn project_geometry(&self, boundary: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        boundary.map_coords(|coord| self.project(coord))
    }

    /// Screen-space drawable geometry of a feature: the projected polygons
    /// (for hit-testing) and their SVG path data.
    pub fn path(&self, feature: &GeoFeature) -> ScreenPath {
        let geometry = self.project_geometry(&feature.boundary);
        let data = crate::io::svg::multipolygon_to_path(&geometry);
        ScreenPath { geometry, data }
    }
}

/// A feature projected into screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenPath {
    pub geometry: MultiPolygon<f64>,
    /// SVG `d` attribute.
    pub data: String,
}
