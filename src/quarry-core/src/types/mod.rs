//! Type system for SQL scalar values.
//!
//! `DataType` carries the "matches" relation (equality up to interchangeable
//! representations), `compatibility` computes widening targets, and `cast`
//! evaluates literals into a target type at plan time.

mod cast;
mod compatibility;
mod data_type;
mod value;

pub use cast::cast_value;
pub use compatibility::{
    compatible_type_for_between_and_in, compatible_type_for_binary, compatible_type_for_case_when,
};
pub use data_type::DataType;
pub use value::Value;
