use serde::{Deserialize, Serialize};

/// How a metric is described in tooltips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricLabel {
    /// Used in the unavailable text: "{name}: {noun} data not available".
    pub noun: String,
    pub description: String,
    pub unit_prefix: String,
    /// Reference year the metric is fetched for.
    pub year: String,
}

impl Default for MetricLabel {
    fn default() -> Self {
        Self {
            noun: "Income".to_string(),
            description: "per capita income".to_string(),
            unit_prefix: "$".to_string(),
            year: "2020".to_string(),
        }
    }
}

impl MetricLabel {
    /// Tooltip text for a feature and its (possibly unavailable) metric.
    pub fn describe(&self, name: &str, value: Option<f64>) -> String {
        match value.filter(|v| v.is_finite()) {
            Some(value) => format!(
                "{name}: {}{} {} ({})",
                self.unit_prefix,
                group_thousands(value),
                self.description,
                self.year,
            ),
            None => format!("{name}: {} data not available", self.noun),
        }
    }
}

/// "1234567.5" -> "1,234,567.5"; at most three fraction digits.
fn group_thousands(value: f64) -> String {
    let text = format!("{:.3}", value.abs());
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = String::with_capacity(text.len() + int.len() / 3 + 1);
    if value < 0.0 && text.bytes().any(|b| b.is_ascii_digit() && b != b'0') { out.push('-') }
    for (i, digit) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 { out.push(',') }
        out.push(digit);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}
