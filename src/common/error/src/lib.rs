//! Error types and result aliases for Quarry.
//!
//! Every crate in the workspace reports failures through [`QuarryError`] so
//! that the optimizer can surface one consistent taxonomy to its caller.

mod error;

pub use error::{QuarryError, QuarryResult};
