//! Logical layer of the Quarry rewrite core.
//!
//! `quarry-logical` holds the two trees every rewrite rule works on:
//!
//! - **Scalar expressions** ([`ScalarOperator`]): typed nodes with a closed set
//!   of kinds and positionally owned children
//! - **Logical plans** ([`OptExpression`]): relational operators (Scan, Filter,
//!   Project, Aggregation, Apply, Select) with owned input subtrees
//!
//! # Example
//!
//! ```rust
//! use quarry_core::DataType;
//! use quarry_logical::{ColumnRefFactory, PlanBuilder, ScalarOperator};
//!
//! let mut columns = ColumnRefFactory::new();
//! let age = columns.create("age", DataType::Int);
//!
//! let plan = PlanBuilder::scan("person", vec![age.clone()])
//!     .filter(ScalarOperator::column(age).gt(ScalarOperator::constant(18i64)))
//!     .build();
//!
//! println!("{}", plan.explain());
//! ```

mod column;
pub mod plan;
pub mod scalar;
pub mod validation;

pub use column::{ColumnRef, ColumnRefFactory};
pub use plan::{AggType, ApplyOperator, LogicalOperator, OperatorType, OptExpression, PlanBuilder};
pub use scalar::{
    BinaryType, CallOp, CaseWhenLayout, CompoundType, LikeType, ScalarKind, ScalarOp,
    ScalarOperator,
};
pub use validation::validate_plan;
