use std::sync::Arc;

use ahash::AHashMap;

use crate::types::{GeoId, MetricValue};

/// Metrics received for one drill-level session, keyed by feature.
///
/// Each session carries the generation token it was opened with; results
/// captured under any other generation are refused.
#[derive(Debug, Clone)]
pub struct MetricAccumulator {
    generation: u64,
    year: Arc<str>,
    values: AHashMap<GeoId, MetricValue>,
}

impl MetricAccumulator {
    pub(crate) fn new(generation: u64, year: Arc<str>) -> Self {
        Self { generation, year, values: AHashMap::new() }
    }

    pub fn generation(&self) -> u64 { self.generation }

    /// Store a result captured under `generation`. Returns false if stale.
    pub(crate) fn record(&mut self, generation: u64, geo_id: GeoId, value: Option<f64>) -> bool {
        if generation != self.generation { return false }
        let metric = MetricValue::new(geo_id.clone(), self.year.clone(), value);
        self.values.insert(geo_id, metric);
        true
    }

    pub fn get(&self, geo_id: &GeoId) -> Option<&MetricValue> { self.values.get(geo_id) }

    /// Resolved value; `None` when unavailable or not fetched yet.
    pub fn value(&self, geo_id: &GeoId) -> Option<f64> {
        self.values.get(geo_id).and_then(|metric| metric.value)
    }

    /// Every received value, unavailable ones as `None`.
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.values().map(|metric| metric.value)
    }

    /// Number of features whose fetch has settled (either way).
    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}
