use serde::Deserialize;
use std::collections::HashMap;

/// Envelope wrapping every Prometheus v1 API response.
///
/// `status` is `"success"` or `"error"`; on error the `error_type` and
/// `error` fields carry the details and `data` is absent.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Payload of a range query: the result type plus the matching series.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeQueryData {
    #[serde(rename = "resultType")]
    pub result_type: String,
    #[serde(default)]
    pub result: Vec<RangeSeries>,
}

/// One time series in a range query result: its label set and the sampled
/// values as `(unix_seconds, value)` pairs. The value arrives as a string
/// on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeSeries {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}

/// Decoded result of one range query, as handed to the pipeline.
#[derive(Debug, Clone)]
pub struct SeriesData {
    pub result_type: String,
    pub series: Vec<RangeSeries>,
}

impl SeriesData {
    /// Total number of samples across all matching series.
    pub fn sample_count(&self) -> usize {
        self.series.iter().map(|s| s.values.len()).sum()
    }

    /// True when the query matched no samples in the window.
    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }
}

impl From<RangeQueryData> for SeriesData {
    fn from(data: RangeQueryData) -> Self {
        Self {
            result_type: data.result_type,
            series: data.result,
        }
    }
}
