//! Function and type metadata consulted by rewrite rules.
//!
//! Rules never reach for global state: every traversal receives a
//! `&dyn Catalog` that stays immutable for the duration of one compilation.

mod builtin;
mod function;

use std::sync::Arc;

use common_error::QuarryResult;

use crate::types::{self, DataType, Value};

pub use builtin::BuiltinCatalog;
pub use function::Function;

/// Read-only snapshot of function signatures and type rules.
///
/// The type-compatibility and literal-cast methods default to the built-in
/// lattice and evaluator. Implementors override them to model a different
/// engine's coercion policy.
pub trait Catalog: Send + Sync {
    /// Resolve a function by name for the given argument types.
    fn lookup_function(&self, name: &str, arg_types: &[DataType]) -> Option<Arc<Function>>;

    /// Widening target for the two sides of a binary predicate.
    fn compatible_type_for_binary(
        &self,
        left: &DataType,
        right: &DataType,
    ) -> QuarryResult<DataType> {
        types::compatible_type_for_binary(left, right)
    }

    /// Widening target for a simple CASE operand and its WHEN clauses.
    fn compatible_type_for_case_when(&self, operand_types: &[DataType]) -> QuarryResult<DataType> {
        types::compatible_type_for_case_when(operand_types)
    }

    /// Widening target for the operands of BETWEEN / IN.
    fn compatible_type_for_between_and_in(
        &self,
        operand_types: &[DataType],
    ) -> QuarryResult<DataType> {
        types::compatible_type_for_between_and_in(operand_types)
    }

    /// Evaluate a literal into the target type at plan time.
    fn cast_literal(&self, value: &Value, target: &DataType) -> QuarryResult<Value> {
        types::cast_value(value, target)
    }
}
