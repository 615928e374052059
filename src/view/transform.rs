use geo::Coord;

/// Pan/zoom applied on top of the projected layers: `screen = layer * scale + translate`.
///
/// Only the view controller constructs non-identity values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    translate_x: f64,
    translate_y: f64,
    scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self { Self::IDENTITY }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform { translate_x: 0.0, translate_y: 0.0, scale: 1.0 };

    pub(crate) fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self { translate_x, translate_y, scale }
    }

    #[inline] pub fn translate_x(&self) -> f64 { self.translate_x }
    #[inline] pub fn translate_y(&self) -> f64 { self.translate_y }
    #[inline] pub fn scale(&self) -> f64 { self.scale }

    pub fn is_identity(&self) -> bool { *self == Self::IDENTITY }

    /// Layer coordinate → screen coordinate.
    pub fn apply(&self, at: Coord<f64>) -> Coord<f64> {
        Coord {
            x: at.x * self.scale + self.translate_x,
            y: at.y * self.scale + self.translate_y,
        }
    }

    /// Screen coordinate → layer coordinate.
    pub fn invert(&self, at: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (at.x - self.translate_x) / self.scale,
            y: (at.y - self.translate_y) / self.scale,
        }
    }

    /// Component-wise blend; `t` is not clamped.
    pub(crate) fn lerp(&self, other: &ViewTransform, t: f64) -> ViewTransform {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        ViewTransform {
            translate_x: mix(self.translate_x, other.translate_x),
            translate_y: mix(self.translate_y, other.translate_y),
            scale: mix(self.scale, other.scale),
        }
    }
}
