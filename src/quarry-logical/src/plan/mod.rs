//! Logical plan trees.
//!
//! An [`OptExpression`] pairs a [`LogicalOperator`] with its owned inputs.
//! Operators own scalar expressions; inputs own nothing but their subtrees.

mod builder;
mod operator;
mod opt_expression;

pub use builder::PlanBuilder;
pub use operator::{AggType, ApplyOperator, LogicalOperator, OperatorType};
pub use opt_expression::OptExpression;
