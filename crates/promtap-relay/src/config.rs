use promtap_pipeline::{EgressSettings, SupplierConfig};
use serde::Deserialize;
use std::time::Duration;

/// Process configuration, loaded once at startup and handed out to the
/// components as owned copies. Nothing re-reads it afterwards.
#[derive(Debug, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub source: SourceConfig,
    /// Settings for the anticipated telemetry egress; currently injected
    /// into the logging sink unused.
    #[serde(default)]
    pub egress: EgressSettings,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Monitoring backend to pull metrics from.
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_polling_interval_secs")]
    pub polling_interval_secs: u64,
    /// Deadline for each individual request against the backend.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_sample_step_secs")]
    pub sample_step_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            polling_interval_secs: default_polling_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            sample_step_secs: default_sample_step_secs(),
        }
    }
}

fn default_address() -> String {
    "http://prometheus:9090".to_string()
}

fn default_polling_interval_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_sample_step_secs() -> u64 {
    10
}

impl RelayConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn supplier_config(&self) -> SupplierConfig {
        SupplierConfig {
            polling_interval: Duration::from_secs(self.source.polling_interval_secs),
            request_timeout: Duration::from_secs(self.source.request_timeout_secs),
            sample_step: Duration::from_secs(self.source.sample_step_secs),
        }
    }
}
