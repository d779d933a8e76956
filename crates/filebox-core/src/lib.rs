//! Core types: mailbox records, sequence numbers, tracing setup

pub mod record;
pub mod tracing;

pub use record::{Record, RecordState, Seq};
pub use crate::tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
