//! Format-specific reading and writing.
//!
//! - `geojson` - GeoJSON FeatureCollections for state and county boundaries
//! - `svg` - SVG export of the current frame

pub(crate) mod geojson;
pub(crate) mod svg;
