//! Core data model for the Quarry rewrite core.
//!
//! This crate provides the read-only collaborators every rewrite rule consults:
//! - `DataType` and the compatibility lattice used for implicit coercion
//! - `Value` and the plan-time literal evaluator (`cast_value`)
//! - `Catalog`, the function/type metadata handle passed into each rule

pub mod catalog;
pub mod types;

// Re-export commonly used types
pub use catalog::{BuiltinCatalog, Catalog, Function};
pub use types::{
    DataType, Value, cast_value, compatible_type_for_between_and_in, compatible_type_for_binary,
    compatible_type_for_case_when,
};
