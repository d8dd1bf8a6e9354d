use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One reporting unit handed from the supplier to the consumer.
///
/// A message is an ordered sequence of opaque, heterogeneously-typed fields
/// (typically a metric name plus a descriptor of its fetched series). The
/// pipeline never interprets or validates the field contents; it only moves
/// the envelope and, at the sink, renders it.
///
/// # Examples
///
/// ```
/// use promtap_common::types::Message;
/// use serde_json::json;
///
/// let msg = Message::new(vec![json!("up"), json!("matrix"), json!(3)]);
/// assert_eq!(msg.to_string(), "up matrix 3");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    fields: Vec<Value>,
}

impl Message {
    pub fn new(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            // Strings render bare; everything else as JSON
            match field {
                Value::String(s) => write!(f, "{s}")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

/// Half-open time interval `[start, end)` queried for metric data in one
/// polling cycle.
///
/// Windows produced by successive successful cycles are contiguous and
/// non-overlapping: each cycle's `start` is the previous successful cycle's
/// `end`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use promtap_common::types::TimeWindow;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 10).unwrap();
/// let window = TimeWindow::new(start, end);
/// assert_eq!(window.duration().num_seconds(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Builds a window. `start` must not be after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end, "window start after end");
        Self { start, end }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.to_rfc3339(),
            self.end.to_rfc3339()
        )
    }
}
