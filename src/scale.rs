//! Continuous color scales derived from an observed value set.

use serde::{Deserialize, Serialize};

use crate::io::svg::Rgb;

/// Fraction of the domain where the piecewise-emphasis breakpoint sits.
pub const EMPHASIS_BREAK: f64 = 0.2;

/// Shape of the value → color mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleShape {
    /// `[min, max]` → two colors.
    #[default]
    Linear,
    /// `[min, min + 0.2 * (max - min), max]` → three colors.
    Piecewise,
    /// Piecewise when most values sit below the breakpoint, linear otherwise.
    Auto,
}

/// Colors used by every scale built for a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub shape: ScaleShape,
    pub low: Rgb,
    pub mid: Rgb,
    pub high: Rgb,
    pub no_data: Rgb,
}

impl Default for Palette {
    /// Sequential blues, light (#f7fbff) → dark (#08306b).
    fn default() -> Self {
        Self {
            shape: ScaleShape::Linear,
            low: Rgb::new(0xf7, 0xfb, 0xff),
            mid: Rgb::new(0x6b, 0xae, 0xd6),
            high: Rgb::new(0x08, 0x30, 0x6b),
            no_data: Rgb::new(0xd3, 0xd3, 0xd3),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ScaleKind {
    NoData,
    Flat(Rgb),
    Linear { domain: [f64; 2], range: [Rgb; 2] },
    Piecewise { domain: [f64; 3], range: [Rgb; 3] },
}

/// A pure `value -> color` mapping. Values outside the domain clamp to the
/// nearest endpoint; non-finite values and missing metrics get the no-data color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    kind: ScaleKind,
    no_data: Rgb,
}

impl ColorScale {
    /// A scale that paints everything with the no-data color.
    pub fn no_data(palette: &Palette) -> Self {
        Self { kind: ScaleKind::NoData, no_data: palette.no_data }
    }

    pub fn color(&self, value: f64) -> Rgb {
        if !value.is_finite() { return self.no_data }

        match &self.kind {
            ScaleKind::NoData => self.no_data,
            ScaleKind::Flat(color) => *color,
            ScaleKind::Linear { domain: [lo, hi], range: [from, to] } => {
                from.lerp(*to, (value - lo) / (hi - lo))
            }
            ScaleKind::Piecewise { domain: [lo, mid, hi], range: [from, via, to] } => {
                if value <= *mid {
                    from.lerp(*via, (value - lo) / (mid - lo))
                } else {
                    via.lerp(*to, (value - mid) / (hi - mid))
                }
            }
        }
    }

    /// Fill for a possibly-unavailable metric.
    pub fn fill(&self, value: Option<f64>) -> Rgb {
        value.map_or(self.no_data, |value| self.color(value))
    }

    pub fn no_data_color(&self) -> Rgb { self.no_data }

    /// Observed `(min, max)`, if any value was observed.
    pub fn domain(&self) -> Option<(f64, f64)> {
        match &self.kind {
            ScaleKind::NoData => None,
            ScaleKind::Flat(_) => None,
            ScaleKind::Linear { domain: [lo, hi], .. } => Some((*lo, *hi)),
            ScaleKind::Piecewise { domain: [lo, _, hi], .. } => Some((*lo, *hi)),
        }
    }

    pub fn is_no_data(&self) -> bool { matches!(self.kind, ScaleKind::NoData) }
}

/// Builds a [`ColorScale`] from the metrics currently known for a layer.
#[derive(Debug, Clone, Default)]
pub struct ColorScaleBuilder {
    palette: Palette,
}

impl ColorScaleBuilder {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette { &self.palette }

    /// Build from a value set; unavailable and non-finite entries are ignored.
    pub fn build<I>(&self, values: I) -> ColorScale
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values = values.into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();

        let Some((lo, hi)) = min_max(&values) else { return ColorScale::no_data(&self.palette) };
        let palette = &self.palette;

        let shape = match palette.shape {
            ScaleShape::Auto => auto_shape(&values, lo, hi),
            shape => shape,
        };

        let kind = if hi <= lo {
            // Degenerate domain: paint the middle of the range.
            ScaleKind::Flat(match shape {
                ScaleShape::Piecewise => palette.mid,
                _ => palette.low.lerp(palette.high, 0.5),
            })
        } else if shape == ScaleShape::Piecewise {
            ScaleKind::Piecewise {
                domain: [lo, lo + EMPHASIS_BREAK * (hi - lo), hi],
                range: [palette.low, palette.mid, palette.high],
            }
        } else {
            ScaleKind::Linear { domain: [lo, hi], range: [palette.low, palette.high] }
        };

        ColorScale { kind, no_data: palette.no_data }
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Emphasis pays off when most values cluster near the minimum.
fn auto_shape(values: &[f64], lo: f64, hi: f64) -> ScaleShape {
    let breakpoint = lo + EMPHASIS_BREAK * (hi - lo);
    let below = values.iter().filter(|&&v| v < breakpoint).count();
    if below * 2 > values.len() { ScaleShape::Piecewise } else { ScaleShape::Linear }
}
