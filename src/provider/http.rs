use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::types::GeoId;

use super::MetricProvider;

/// Fetches one metric per request: `GET {endpoint}?geoFips={id}`, reading the
/// `"{year}"` field of the JSON body.
#[derive(Debug, Clone)]
pub struct HttpMetricProvider {
    client: reqwest::Client,
    endpoint: String,
    year: String,
}

impl HttpMetricProvider {
    pub fn new(endpoint: impl Into<String>, year: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint: endpoint.into(), year: year.into() }
    }
}

#[async_trait(?Send)]
impl MetricProvider for HttpMetricProvider {
    async fn fetch_one(&self, geo_id: &GeoId) -> Result<Option<f64>> {
        debug!(geo_id = %geo_id, endpoint = %self.endpoint, "fetching metric");

        let response = self.client.get(&self.endpoint)
            .query(&[("geoFips", geo_id.as_str())])
            .send()
            .await
            .with_context(|| format!("Request for {geo_id} failed"))?;

        let status = response.status();
        let body = response.bytes().await
            .with_context(|| format!("Failed to read response for {geo_id}"))?;

        read_metric(status, &body, &self.year, geo_id)
    }
}

/// Interpret one endpoint response. Error statuses fail; a missing or
/// non-numeric year field is an unavailable metric.
fn read_metric(status: StatusCode, body: &[u8], year: &str, geo_id: &GeoId) -> Result<Option<f64>> {
    if !status.is_success() {
        let reason = serde_json::from_slice::<Value>(body).ok()
            .and_then(|body| body["error"].as_str().map(str::to_string))
            .unwrap_or_else(|| "no error message".to_string());
        return Err(anyhow!("Metric endpoint returned {status} for {geo_id}: {reason}"));
    }

    let body: Value = serde_json::from_slice(body)
        .with_context(|| format!("Invalid JSON for {geo_id}"))?;
    Ok(body[year].as_f64().filter(|v| v.is_finite()))
}
