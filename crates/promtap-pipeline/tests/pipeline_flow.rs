use async_trait::async_trait;
use promtap_common::types::{Message, TimeWindow};
use promtap_pipeline::{Consumer, Sink, Supplier, SupplierConfig};
use promtap_source::error::Result as SourceResult;
use promtap_source::models::{RangeSeries, SeriesData};
use promtap_source::SourceClient;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Source that lists the same names every cycle and answers every range
/// query with a single-sample matrix.
struct FixedSource {
    names: Vec<&'static str>,
}

#[async_trait]
impl SourceClient for FixedSource {
    async fn list_metric_names(&self) -> SourceResult<Vec<String>> {
        Ok(self.names.iter().map(|n| n.to_string()).collect())
    }

    async fn query_range(
        &self,
        _name: &str,
        _window: &TimeWindow,
        _step: Duration,
    ) -> SourceResult<SeriesData> {
        Ok(SeriesData {
            result_type: "matrix".to_string(),
            series: vec![RangeSeries {
                metric: HashMap::new(),
                values: vec![(0.0, "1".to_string())],
            }],
        })
    }
}

#[derive(Default)]
struct RecordingSink {
    delivered: Mutex<Vec<Message>>,
}

impl RecordingSink {
    fn names(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.fields()[0].as_str().unwrap().to_string())
            .collect()
    }
}

impl Sink for RecordingSink {
    fn deliver(&self, message: &Message) {
        self.delivered.lock().unwrap().push(message.clone());
    }
}

fn test_config() -> SupplierConfig {
    SupplierConfig {
        polling_interval: Duration::from_millis(5),
        request_timeout: Duration::from_secs(1),
        sample_step: Duration::from_secs(10),
    }
}

/// Waits until the sink has seen at least `count` messages.
async fn wait_for_messages(sink: &RecordingSink, count: usize) {
    timeout(Duration::from_secs(2), async {
        loop {
            if sink.delivered.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("sink never reached the expected message count");
}

#[tokio::test]
async fn relays_each_listed_metric_in_order() {
    let source = Arc::new(FixedSource {
        names: vec!["up", "http_requests_total"],
    });
    let sink = Arc::new(RecordingSink::default());

    let supplier = Supplier::new(source, test_config());
    let consumer = Consumer::new(sink.clone());

    let (tx, rx) = mpsc::channel(1);
    let shutdown = CancellationToken::new();
    let supplier_task = tokio::spawn(supplier.supply(tx, shutdown.clone()));
    let consumer_task = tokio::spawn(consumer.consume(rx));

    wait_for_messages(&sink, 2).await;

    // Exactly one cycle's worth so far, in listing order, each message
    // carrying its originating metric name.
    let first_cycle: Vec<String> = sink.names().into_iter().take(2).collect();
    assert_eq!(first_cycle, vec!["up", "http_requests_total"]);

    // Shutdown order: stop the supplier first, which closes the channel
    // and lets the consumer drain out on its own.
    shutdown.cancel();
    supplier_task.await.unwrap();
    timeout(Duration::from_secs(2), consumer_task)
        .await
        .expect("consumer did not stop after channel closed")
        .unwrap();

    // Whatever was emitted alternates cycles of the same two names, in
    // emission order.
    let names = sink.names();
    assert!(names.len() >= 2);
    for pair in names.chunks(2) {
        if pair.len() == 2 {
            assert_eq!(pair, ["up", "http_requests_total"]);
        }
    }
}

#[tokio::test]
async fn zero_listed_metrics_produce_no_messages() {
    let source = Arc::new(FixedSource { names: vec![] });
    let sink = Arc::new(RecordingSink::default());

    let supplier = Supplier::new(source, test_config());
    let consumer = Consumer::new(sink.clone());

    let (tx, rx) = mpsc::channel(1);
    let shutdown = CancellationToken::new();
    let supplier_task = tokio::spawn(supplier.supply(tx, shutdown.clone()));
    let consumer_task = tokio::spawn(consumer.consume(rx));

    // Let several cycles run.
    tokio::time::sleep(Duration::from_millis(100)).await;

    shutdown.cancel();
    supplier_task.await.unwrap();
    consumer_task.await.unwrap();

    assert!(sink.delivered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn consumer_outlives_supplier_and_drains_the_channel() {
    let source = Arc::new(FixedSource { names: vec!["up"] });
    let sink = Arc::new(RecordingSink::default());

    let supplier = Supplier::new(source, test_config());
    let consumer = Consumer::new(sink.clone());

    let (tx, rx) = mpsc::channel(1);
    let shutdown = CancellationToken::new();
    let supplier_task = tokio::spawn(supplier.supply(tx, shutdown.clone()));
    let consumer_task = tokio::spawn(consumer.consume(rx));

    wait_for_messages(&sink, 1).await;

    shutdown.cancel();
    supplier_task.await.unwrap();

    // With the supplier gone the only sender is dropped; the consumer's
    // drain loop must terminate on channel closure, not on any timeout.
    timeout(Duration::from_secs(2), consumer_task)
        .await
        .expect("consumer did not stop after channel closed")
        .unwrap();
}
