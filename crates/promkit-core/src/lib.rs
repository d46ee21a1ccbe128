//! promkit core: naming rules, metric kinds, and the shared error surface.
//!
//! This crate is shared by the metric registry and the alert-rule generator.
//! It carries no metrics-backend or serialization dependencies so both sides
//! can agree on how names are canonicalized without pulling each other in.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `PromkitError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod kind;
pub mod naming;

/// Shared result type.
pub use error::{PromkitError, Result};
pub use kind::MetricKind;
pub use naming::{normalize, qualify, title_case};
