//! Top-level facade crate for promkit.
//!
//! Re-exports the core types, the metric registry, and the rule generator so
//! users can depend on a single crate.

pub mod core {
    pub use promkit_core::*;
}

pub mod metrics {
    pub use promkit_metrics::*;
}

pub mod rules {
    pub use promkit_rules::*;
}
