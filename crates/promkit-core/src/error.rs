//! Shared error type across promkit crates.

use thiserror::Error;

use crate::kind::MetricKind;

/// Shared result type.
pub type Result<T> = std::result::Result<T, PromkitError>;

/// Unified error type used by the metric registry and the rule generator.
#[derive(Debug, Error)]
pub enum PromkitError {
    /// A fully-qualified metric name is already bound to another kind.
    #[error("{name} is already used for a different type of metric (bound as {existing}, requested {requested})")]
    MetricKindConflict {
        name: String,
        existing: MetricKind,
        requested: MetricKind,
    },
    /// The metrics backend refused an operation (other than a duplicate registration).
    #[error("metrics backend: {0}")]
    Backend(String),
    /// Config file could not be read or failed validation.
    #[error("config: {0}")]
    Config(String),
    /// Rule output could not be serialized.
    #[error("render: {0}")]
    Render(String),
}

impl PromkitError {
    /// Stable short code, suitable for logs and exit diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            PromkitError::MetricKindConflict { .. } => "METRIC_KIND_CONFLICT",
            PromkitError::Backend(_) => "BACKEND",
            PromkitError::Config(_) => "CONFIG",
            PromkitError::Render(_) => "RENDER",
        }
    }
}
