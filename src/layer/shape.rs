use std::{ops::BitOr, sync::Arc};

use geo::Coord;

use crate::{io::svg::Rgb, types::{GeoId, GeoType}};

/// Pointer events a shape can be bound to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer entered the shape at a viewport position.
    Hover(Coord<f64>),
    /// Pointer moved within the shape.
    Move(Coord<f64>),
    Leave,
    Click,
}

/// The set of pointer events a shape responds to, bound once per feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    pub const HOVER: Capabilities = Capabilities(1 << 0);
    pub const MOVE: Capabilities = Capabilities(1 << 1);
    pub const LEAVE: Capabilities = Capabilities(1 << 2);
    pub const CLICK: Capabilities = Capabilities(1 << 3);

    /// States drill down on click; counties only report on hover.
    pub fn for_level(level: GeoType) -> Self {
        let hover = Self::HOVER | Self::MOVE | Self::LEAVE;
        match level {
            GeoType::State => hover | Self::CLICK,
            GeoType::County => hover,
        }
    }

    pub fn contains(self, other: Capabilities) -> bool { self.0 & other.0 == other.0 }

    pub fn accepts(self, event: &PointerEvent) -> bool {
        self.contains(match event {
            PointerEvent::Hover(_) => Self::HOVER,
            PointerEvent::Move(_) => Self::MOVE,
            PointerEvent::Leave => Self::LEAVE,
            PointerEvent::Click => Self::CLICK,
        })
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities { Capabilities(self.0 | rhs.0) }
}

/// One painted feature of a layer.
#[derive(Debug, Clone)]
pub struct Shape {
    pub(crate) id: GeoId,
    pub(crate) name: Arc<str>,
    pub(crate) path: String,
    pub(crate) fill: Rgb,
    pub(crate) stroke_width: f64,
    pub(crate) capabilities: Capabilities,
}

impl Shape {
    pub fn id(&self) -> &GeoId { &self.id }
    pub fn name(&self) -> &str { &self.name }
    /// Screen-space SVG path data.
    pub fn path(&self) -> &str { &self.path }
    pub fn fill(&self) -> Rgb { self.fill }
    pub fn stroke_width(&self) -> f64 { self.stroke_width }
    pub fn capabilities(&self) -> Capabilities { self.capabilities }
}
