use chrono::{DateTime, Utc};
use promtap_common::types::{Message, TimeWindow};
use promtap_source::SourceClient;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

/// Immutable supplier settings, fixed at construction.
#[derive(Debug, Clone)]
pub struct SupplierConfig {
    /// Fixed sleep between cycles; not adjusted for cycle duration, so
    /// cycles can run longer than the nominal cadence under load.
    pub polling_interval: Duration,
    /// Deadline applied freshly to every individual source call.
    pub request_timeout: Duration,
    /// Sampling step for every range query.
    pub sample_step: Duration,
}

/// What the supplier does with the rest of a cycle after a failed source
/// call. The listing and fetch call sites deliberately use different
/// policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abandon the whole cycle: nothing emitted, window boundary untouched.
    SkipCycle,
    /// Keep what was already emitted, drop the rest of the cycle; the
    /// window boundary still advances.
    AbortCycle,
}

/// Drives the poll loop: advance a time window, list metric names, fetch
/// each name's series, emit messages into the outbound channel.
pub struct Supplier {
    source: Arc<dyn SourceClient>,
    config: SupplierConfig,
    window_start: DateTime<Utc>,
    on_list_failure: FailurePolicy,
    on_fetch_failure: FailurePolicy,
}

impl Supplier {
    /// The window origin is fixed here, once: the first cycle queries
    /// `[construction time, first fetch time)`.
    pub fn new(source: Arc<dyn SourceClient>, config: SupplierConfig) -> Self {
        Self {
            source,
            config,
            window_start: Utc::now(),
            on_list_failure: FailurePolicy::SkipCycle,
            on_fetch_failure: FailurePolicy::AbortCycle,
        }
    }

    /// Overrides the policy applied when metric-name listing fails.
    pub fn list_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_list_failure = policy;
        self
    }

    /// Overrides the policy applied when a per-name range query fails.
    pub fn fetch_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_fetch_failure = policy;
        self
    }

    /// Runs the poll loop until `shutdown` fires or the receiving side of
    /// `outbound` goes away. Remote-call failures never end the loop; they
    /// are logged and handled per call-site policy.
    ///
    /// Sends suspend until the consumer has freed the channel's single
    /// slot, so the supplier never runs more than one message ahead.
    pub async fn supply(mut self, outbound: mpsc::Sender<Message>, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.config.polling_interval.as_secs(),
            timeout_secs = self.config.request_timeout.as_secs(),
            step_secs = self.config.sample_step.as_secs(),
            "supplier started"
        );

        loop {
            tokio::select! {
                _ = sleep(self.config.polling_interval) => {}
                _ = shutdown.cancelled() => {
                    tracing::info!("shutdown requested, supplier stopping");
                    return;
                }
            }

            let listed = timeout(
                self.config.request_timeout,
                self.source.list_metric_names(),
            )
            .await;

            let names = match listed {
                Ok(Ok(names)) => names,
                Ok(Err(e)) => {
                    tracing::warn!(
                        error = %e,
                        policy = ?self.on_list_failure,
                        "metric name listing failed"
                    );
                    match self.on_list_failure {
                        FailurePolicy::SkipCycle => continue,
                        FailurePolicy::AbortCycle => Vec::new(),
                    }
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = self.config.request_timeout.as_secs(),
                        policy = ?self.on_list_failure,
                        "metric name listing timed out"
                    );
                    match self.on_list_failure {
                        FailurePolicy::SkipCycle => continue,
                        FailurePolicy::AbortCycle => Vec::new(),
                    }
                }
            };

            // The window boundary is fixed before the per-name loop and is
            // not rolled back by a mid-loop abort.
            let window = TimeWindow::new(self.window_start, Utc::now());
            tracing::debug!(count = names.len(), window = %window, "cycle listing complete");

            let mut advance = true;
            for name in &names {
                let fetched = timeout(
                    self.config.request_timeout,
                    self.source
                        .query_range(name, &window, self.config.sample_step),
                )
                .await;

                let series = match fetched {
                    Ok(Ok(series)) => series,
                    Ok(Err(e)) => {
                        tracing::warn!(
                            metric = %name,
                            error = %e,
                            policy = ?self.on_fetch_failure,
                            "range query failed"
                        );
                        if self.on_fetch_failure == FailurePolicy::SkipCycle {
                            advance = false;
                        }
                        break;
                    }
                    Err(_) => {
                        tracing::warn!(
                            metric = %name,
                            timeout_secs = self.config.request_timeout.as_secs(),
                            policy = ?self.on_fetch_failure,
                            "range query timed out"
                        );
                        if self.on_fetch_failure == FailurePolicy::SkipCycle {
                            advance = false;
                        }
                        break;
                    }
                };

                if series.is_empty() {
                    tracing::debug!(metric = %name, "no samples in window");
                    continue;
                }

                let message = Message::new(vec![
                    json!(name),
                    json!(series.result_type),
                    json!(series.sample_count()),
                ]);

                if outbound.send(message).await.is_err() {
                    tracing::info!("outbound channel closed, supplier stopping");
                    return;
                }
            }

            if advance {
                self.window_start = window.end;
            }
        }
    }
}
