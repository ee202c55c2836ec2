//! Quarry Playground - sample plans and demos
//!
//! This crate provides an executable for watching the rewrite core work on
//! small hand-built plans.
//!
//! # Available Binaries
//!
//! - **`rewrite-demo`**: runs the implicit-cast, CASE and decorrelation
//!   examples and prints each plan before and after rewriting
//!
//! # Usage
//!
//! ```bash
//! cargo run --package quarry-playground --bin rewrite-demo -- demo --trace
//! ```

pub mod samples;
pub mod utils;

pub use samples::{case_when_plan, cast_plan, decorrelate_plan};
pub use utils::{print_divider, print_header, print_rewrite};
