mod controller;
mod transform;

pub use controller::{TransitionConfig, ViewTransformController};
pub use transform::ViewTransform;
