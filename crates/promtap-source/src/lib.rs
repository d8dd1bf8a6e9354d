//! Read-side client for the monitoring backend.
//!
//! The [`SourceClient`] trait is the capability the supplier polls: list
//! the distinct metric names, then run a range query per name. The only
//! production implementation is [`PrometheusSource`]; tests substitute
//! their own.

pub mod error;
pub mod models;
mod prometheus;

pub use prometheus::PrometheusSource;

use async_trait::async_trait;
use promtap_common::types::TimeWindow;
use std::time::Duration;

use crate::error::Result;
use crate::models::SeriesData;

/// Read API of the monitoring backend.
///
/// Both calls are plain futures; the caller owns the deadline by wrapping
/// them in its own timeout and dropping them on expiry. Implementations
/// must tolerate one call after another without external synchronization
/// (the supplier never issues concurrent calls).
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// All distinct values of the reserved identifying label, i.e. the set
    /// of metric names currently known to the backend. The set may grow or
    /// shrink between calls.
    async fn list_metric_names(&self) -> Result<Vec<String>>;

    /// Sampled values of one metric over `[window.start, window.end)` at
    /// the fixed `step`.
    async fn query_range(
        &self,
        name: &str,
        window: &TimeWindow,
        step: Duration,
    ) -> Result<SeriesData>;
}
