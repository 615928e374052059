mod geom;
mod projection;

pub(crate) use geom::Geometries;
pub use projection::{Projection, ScreenPath, Viewport};
