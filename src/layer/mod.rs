mod label;
mod layer;
mod shape;

pub use label::MetricLabel;
pub use layer::{FeatureLayer, LayerStyle};
pub use shape::{Capabilities, PointerEvent, Shape};
