use async_trait::async_trait;
use promtap_common::types::TimeWindow;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::error::{Result, SourceError};
use crate::models::{ApiEnvelope, RangeQueryData, SeriesData};
use crate::SourceClient;

/// [`SourceClient`] over the Prometheus HTTP v1 API.
#[derive(Clone, Debug)]
pub struct PrometheusSource {
    base_url: Url,
    client: Client,
}

impl PrometheusSource {
    /// Builds a client for the backend at `address` (e.g.
    /// `http://prometheus:9090`). Fails if the address does not parse as a
    /// URL or the HTTP client cannot be constructed; callers treat that as
    /// fatal at startup.
    pub fn new(address: &str) -> Result<Self> {
        let mut base_url = Url::parse(address)
            .map_err(|e| SourceError::InvalidAddress(format!("{address}: {e}")))?;
        // A trailing slash keeps Url::join from eating the last path segment
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        let client = Client::builder().build()?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SourceError::InvalidAddress(format!("{path}: {e}")))
    }

    /// Issues a GET and decodes the standard response envelope, mapping
    /// HTTP-level and envelope-level failures to their error variants.
    async fn get_envelope<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        let resp = self.client.get(url).query(query).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Http { status, body });
        }

        let envelope: ApiEnvelope<T> = resp.json().await?;
        if !envelope.is_success() {
            return Err(SourceError::Api {
                error_type: envelope.error_type.unwrap_or_else(|| "unknown".to_string()),
                message: envelope.error.unwrap_or_default(),
            });
        }

        envelope.data.ok_or_else(|| SourceError::Api {
            error_type: "unknown".to_string(),
            message: "success envelope without data".to_string(),
        })
    }
}

#[async_trait]
impl SourceClient for PrometheusSource {
    async fn list_metric_names(&self) -> Result<Vec<String>> {
        let url = self.endpoint("api/v1/label/__name__/values")?;
        let names: Vec<String> = self.get_envelope(url, &[]).await?;

        tracing::debug!(count = names.len(), "listed metric names");
        Ok(names)
    }

    async fn query_range(
        &self,
        name: &str,
        window: &TimeWindow,
        step: Duration,
    ) -> Result<SeriesData> {
        let url = self.endpoint("api/v1/query_range")?;
        let query = [
            ("query", name.to_string()),
            ("start", window.start.to_rfc3339()),
            ("end", window.end.to_rfc3339()),
            ("step", format!("{}s", step.as_secs())),
        ];

        let data: RangeQueryData = self.get_envelope(url, &query).await?;
        Ok(data.into())
    }
}
