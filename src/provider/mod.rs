//! Metric sources. The engine only ever asks for one metric per call.

#[cfg(feature = "http")]
mod http;
mod series;

use async_trait::async_trait;

use crate::types::GeoId;

#[cfg(feature = "http")]
pub use http::HttpMetricProvider;
pub use series::StaticMetricProvider;

/// Asynchronously resolves the metric of one feature for the reference year.
///
/// `Ok(None)` means the metric is unavailable. An `Err` is treated exactly
/// like `Ok(None)` by the engine.
#[async_trait(?Send)]
pub trait MetricProvider {
    async fn fetch_one(&self, geo_id: &GeoId) -> anyhow::Result<Option<f64>>;
}
