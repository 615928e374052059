use std::sync::Arc;

use super::GeoId;

/// A metric fetched for one feature. `value` is `None` when unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub geo_id: GeoId,
    pub year: Arc<str>,
    pub value: Option<f64>,
}

impl MetricValue {
    /// Non-finite numbers are treated as unavailable.
    pub fn new(geo_id: GeoId, year: Arc<str>, value: Option<f64>) -> Self {
        Self { geo_id, year, value: value.filter(|v| v.is_finite()) }
    }

    pub fn is_available(&self) -> bool { self.value.is_some() }
}
