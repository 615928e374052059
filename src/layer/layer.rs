use std::io::Write;

use ahash::AHashMap;
use anyhow::Result;
use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

use crate::{
    geom::{Geometries, Projection, ScreenPath},
    scale::ColorScale,
    tooltip::TooltipController,
    types::{GeoFeature, GeoId, GeoType},
};

use super::{Capabilities, PointerEvent, Shape};

/// Stroke and tooltip styling for feature layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    pub state_stroke: f64,
    pub county_stroke: f64,
    /// Hovered shapes get their base stroke multiplied by this.
    pub hover_stroke_factor: f64,
    /// Tooltip distance from the pointer, on both axes.
    pub tooltip_offset: f64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self { state_stroke: 0.3, county_stroke: 0.1, hover_stroke_factor: 4.0, tooltip_offset: 15.0 }
    }
}

/// One drill level drawn as colored shapes bound to pointer interactions.
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    level: GeoType,
    shapes: Vec<Shape>,
    index: AHashMap<GeoId, usize>,
    geoms: Geometries,
    scale: ColorScale,
    hovered: Option<usize>,
    base_stroke: f64,
    hover_stroke: f64,
    tooltip_offset: f64,
}

impl FeatureLayer {
    /// Project and paint `features`. Paths are built once here and reused.
    pub fn mount<'a>(
        level: GeoType,
        features: impl IntoIterator<Item = &'a GeoFeature>,
        projection: &Projection,
        style: &LayerStyle,
        scale: ColorScale,
    ) -> Self {
        let base_stroke = match level {
            GeoType::State => style.state_stroke,
            GeoType::County => style.county_stroke,
        };
        let capabilities = Capabilities::for_level(level);

        let mut shapes = Vec::new();
        let mut screen = Vec::new();
        let mut index = AHashMap::new();
        for feature in features {
            let ScreenPath { geometry, data } = projection.path(feature);
            index.insert(feature.id.clone(), shapes.len());
            shapes.push(Shape {
                id: feature.id.clone(),
                name: feature.name.clone(),
                path: data,
                fill: scale.no_data_color(),
                stroke_width: base_stroke,
                capabilities,
            });
            screen.push(geometry);
        }

        Self {
            level,
            shapes,
            index,
            geoms: Geometries::new(screen),
            scale,
            hovered: None,
            base_stroke,
            hover_stroke: base_stroke * style.hover_stroke_factor,
            tooltip_offset: style.tooltip_offset,
        }
    }

    pub fn level(&self) -> GeoType { self.level }

    pub fn len(&self) -> usize { self.shapes.len() }

    pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    pub fn shapes(&self) -> &[Shape] { &self.shapes }

    pub fn shape(&self, id: &GeoId) -> Option<&Shape> {
        self.index.get(id).map(|&idx| &self.shapes[idx])
    }

    pub fn ids(&self) -> impl Iterator<Item = &GeoId> {
        self.shapes.iter().map(|shape| &shape.id)
    }

    pub fn contains(&self, id: &GeoId) -> bool { self.index.contains_key(id) }

    pub fn color_scale(&self) -> &ColorScale { &self.scale }

    pub fn hovered(&self) -> Option<&GeoId> {
        self.hovered.map(|idx| &self.shapes[idx].id)
    }

    /// Screen-space (pre pan/zoom) bounding box of a shape.
    pub fn screen_bounds(&self, id: &GeoId) -> Option<Rect<f64>> {
        self.index.get(id).and_then(|&idx| self.geoms.bounds_of(idx))
    }

    /// Shape under a layer-space point.
    pub fn locate(&self, at: Coord<f64>) -> Option<&GeoId> {
        self.geoms.locate(at).map(|idx| &self.shapes[idx].id)
    }

    /// Repaint every shape from a new scale and the metrics known so far.
    pub fn recolor(&mut self, scale: ColorScale, metric: impl Fn(&GeoId) -> Option<f64>) {
        for shape in &mut self.shapes {
            shape.fill = scale.fill(metric(&shape.id));
        }
        self.scale = scale;
    }

    /// Route a pointer event to the shape bound to `id`.
    ///
    /// Hover shows the tooltip with `describe(shape)`; move only repositions
    /// it; leave clears it once. Returns the state to drill into on click.
    pub fn dispatch(
        &mut self,
        id: &GeoId,
        event: PointerEvent,
        tooltip: &mut TooltipController,
        describe: impl FnOnce(&Shape) -> String,
    ) -> Option<GeoId> {
        let &idx = self.index.get(id)?;
        if !self.shapes[idx].capabilities.accepts(&event) { return None }

        let offset = self.tooltip_offset;
        match event {
            PointerEvent::Hover(at) => {
                if let Some(previous) = self.hovered.replace(idx) {
                    self.shapes[previous].stroke_width = self.base_stroke;
                }
                let shape = &mut self.shapes[idx];
                shape.stroke_width = self.hover_stroke;
                tooltip.show(describe(shape), at.x + offset, at.y + offset);
                None
            }
            PointerEvent::Move(at) => {
                if self.hovered == Some(idx) {
                    tooltip.move_to(at.x + offset, at.y + offset);
                }
                None
            }
            PointerEvent::Leave => {
                if self.hovered == Some(idx) {
                    self.hovered = None;
                    self.shapes[idx].stroke_width = self.base_stroke;
                    tooltip.hide();
                }
                None
            }
            PointerEvent::Click => Some(self.shapes[idx].id.clone()),
        }
    }

    /// Restore the hovered shape's stroke and hide its tooltip.
    /// Returns false if nothing was hovered.
    pub fn clear_hover(&mut self, tooltip: &mut TooltipController) -> bool {
        let Some(idx) = self.hovered.take() else { return false };
        self.shapes[idx].stroke_width = self.base_stroke;
        tooltip.hide();
        true
    }

    /// Drop every shape, clearing a pending highlight and its tooltip.
    pub fn unmount(mut self, tooltip: &mut TooltipController) {
        self.clear_hover(tooltip);
    }

    /// Write each shape as an SVG `<path>`.
    pub(crate) fn write_svg(&self, writer: &mut impl Write) -> Result<()> {
        let class = self.level.to_str();
        for (idx, shape) in self.shapes.iter().enumerate() {
            let hover = if self.hovered == Some(idx) { " hover" } else { "" };
            writeln!(
                writer,
                r#"<path class="{class}{hover}" data-id="{}" style="fill:{};stroke-width:{}" d="{}"/>"#,
                shape.id,
                shape.fill,
                shape.stroke_width,
                shape.path,
            )?;
        }
        Ok(())
    }
}
