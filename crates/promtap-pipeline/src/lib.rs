//! The supplier/consumer pipeline at the heart of the relay.
//!
//! A [`Supplier`] polls the monitoring backend on a fixed cadence
//! (enumerate metric names, then range-query each one over an advancing
//! time window) and pushes one [`promtap_common::types::Message`] per
//! fetched series into a bounded channel. A [`Consumer`] drains that channel in
//! arrival order and hands each message to a [`Sink`]. Exactly one channel
//! connects exactly one supplier to exactly one consumer.

pub mod consumer;
pub mod sink;
pub mod supplier;

pub use consumer::Consumer;
pub use sink::{EgressSettings, LogSink, Sink};
pub use supplier::{FailurePolicy, Supplier, SupplierConfig};
