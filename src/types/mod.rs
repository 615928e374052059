mod feature;
mod geo_id;
mod geo_type;
mod metric;

pub use feature::{GeoFeature, GeometrySet};
pub use geo_id::GeoId;
pub use geo_type::GeoType;
pub use metric::MetricValue;
