use ahash::AHashMap;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::types::GeoId;

use super::MetricProvider;

/// A prefetched metric series held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticMetricProvider {
    values: AHashMap<GeoId, f64>,
}

impl StaticMetricProvider {
    pub fn new(values: impl IntoIterator<Item = (GeoId, f64)>) -> Self {
        Self { values: values.into_iter().collect() }
    }

    /// Parse records of the form `[{ "GeoFIPS": "01001", "2020": 45912 }, ...]`.
    /// Records without a numeric value for `year` are left out (unavailable).
    pub fn from_json_records(bytes: &[u8], year: &str) -> Result<Self> {
        let records: Vec<Value> = serde_json::from_slice(bytes)
            .context("Failed to parse metric records (expected a JSON array)")?;

        let mut values = AHashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let geo_id = match &record["GeoFIPS"] {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => return Err(anyhow!("Metric record {idx} has no GeoFIPS")),
            };
            if let Some(value) = numeric(&record[year]) {
                values.insert(GeoId::from(geo_id), value);
            }
        }

        Ok(Self { values })
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

/// Numbers, or strings holding numbers (e.g. "45912").
fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

#[async_trait(?Send)]
impl MetricProvider for StaticMetricProvider {
    async fn fetch_one(&self, geo_id: &GeoId) -> Result<Option<f64>> {
        Ok(self.values.get(geo_id).copied())
    }
}
