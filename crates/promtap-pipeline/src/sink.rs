use promtap_common::types::Message;
use serde::Deserialize;

/// Destination for consumed messages: one message at a time, synchronous,
/// no return value.
pub trait Sink: Send + Sync {
    fn deliver(&self, message: &Message);
}

/// Settings for the anticipated telemetry egress. Injected into the
/// logging stand-in but not consumed by it; a real egress sink would read
/// them.
#[derive(Debug, Clone, Deserialize)]
pub struct EgressSettings {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_egress_port")]
    pub port: u16,
    #[serde(default)]
    pub api_token: Option<String>,
    /// `"udp"` or `"api"`.
    #[serde(default = "default_egress_protocol")]
    pub protocol: String,
    #[serde(default = "default_egress_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default = "default_egress_base_path")]
    pub base_path: String,
}

impl Default for EgressSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: default_egress_port(),
            api_token: None,
            protocol: default_egress_protocol(),
            timeout_secs: default_egress_timeout_secs(),
            dry_run: false,
            namespace: None,
            base_path: default_egress_base_path(),
        }
    }
}

fn default_egress_port() -> u16 {
    443
}

fn default_egress_protocol() -> String {
    "api".to_string()
}

fn default_egress_timeout_secs() -> u64 {
    2
}

fn default_egress_base_path() -> String {
    "/tel/v2.0/metrics".to_string()
}

/// Stand-in sink that logs each message's fields. Holds the egress
/// settings a real forwarding sink would use.
pub struct LogSink {
    #[allow(dead_code)] // consumed once a real egress sink replaces this
    egress: EgressSettings,
}

impl LogSink {
    pub fn new(egress: EgressSettings) -> Self {
        Self { egress }
    }
}

impl Sink for LogSink {
    fn deliver(&self, message: &Message) {
        tracing::info!(%message, "message received");
    }
}
