use promtap_common::types::Message;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::sink::Sink;

/// Drains the message channel and delivers each message to the sink,
/// strictly sequentially and in arrival order.
pub struct Consumer {
    sink: Arc<dyn Sink>,
}

impl Consumer {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }

    /// Blocks on the channel until it closes, then returns. Channel closure
    /// is the sole termination signal; there is no timeout-based or
    /// count-based exit. Each message is delivered exactly once before the
    /// next is received.
    pub async fn consume(self, mut inbound: mpsc::Receiver<Message>) {
        while let Some(message) = inbound.recv().await {
            self.sink.deliver(&message);
        }
        tracing::info!("message channel closed, consumer stopping");
    }
}
