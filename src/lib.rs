//! Quarry - rule-based rewrite core for an analytical SQL optimizer
//!
//! Quarry takes a validated logical plan and applies semantics-preserving
//! rewrites (implicit type coercion, predicate normalization and subquery
//! decorrelation) before cost-based planning.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export core crates
pub use common_config as config;
pub use common_error as error;
pub use quarry_core as core;
pub use quarry_logical as logical;
pub use quarry_optimizer as optimizer;

/// Quarry version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
