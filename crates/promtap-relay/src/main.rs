mod config;

use anyhow::{Context, Result};
use promtap_pipeline::{Consumer, LogSink, Supplier};
use promtap_source::PrometheusSource;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("promtap=info".parse()?))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/relay.toml".to_string());

    let config = config::RelayConfig::load(&config_path)
        .with_context(|| format!("Failed to load config '{config_path}'"))?;
    tracing::info!(source = %config.source.address, "promtap-relay starting");

    // Construction failure is fatal, before any polling begins.
    let source = PrometheusSource::new(&config.source.address)
        .context("Failed to create source client")?;

    let supplier = Supplier::new(Arc::new(source), config.supplier_config());
    let consumer = Consumer::new(Arc::new(LogSink::new(config.egress.clone())));

    // Exactly one channel between exactly one supplier and one consumer.
    // Capacity 1 keeps the supplier at most one message ahead.
    let (tx, rx) = mpsc::channel(1);
    let shutdown = CancellationToken::new();

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down gracefully");
                shutdown.cancel();
            }
        });
    }

    // The supplier task owns the only sender: once its loop stops, the
    // channel closes and the consumer drains out. Abrupt termination
    // (SIGKILL, panic=abort) skips this cleanup; messages in flight are
    // lost, which is accepted.
    let supplier_task = tokio::spawn(supplier.supply(tx, shutdown));
    consumer.consume(rx).await;
    supplier_task.await?;

    Ok(())
}
