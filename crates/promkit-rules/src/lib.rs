//! promkit rules: alert rule files for Prometheus 1.x and 2.x.
//!
//! The pipeline is pure: rule definitions in, rule-file text out.
//! - `expand`: `$N` placeholders → prefixed, normalized metric names
//! - `merge`: ordered label/annotation maps with built-ins taking precedence
//! - `render`: version dispatch plus the two output formats

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod expand;
pub mod merge;
pub mod model;
pub mod render;

pub use model::{AlertRule, AlertRuleGroup, NameValue, PrometheusVersion, Severity};
pub use render::{render, render_group, RenderedRule};
