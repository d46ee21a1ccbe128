//! promkit metrics: a typed, deduplicating registry over `prometheus`.
//!
//! - Names are normalized and prefixed once, then bound to exactly one
//!   collector of one kind (`store`).
//! - Handles are cheap clones; `time()` returns a drop guard that always
//!   records elapsed seconds.
//! - A lazily-created `<prefix>_errors{error_type=...}` counter backs
//!   `MetricRegistry::error`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod handles;
pub mod registry;
pub mod store;
pub mod summary;
pub mod timer;

pub use config::MetricsConfig;
pub use handles::{Counter, ErrorCounter, Gauge, Histogram, MetricHandle, Summary};
pub use registry::MetricRegistry;
pub use timer::ScopedTimer;
