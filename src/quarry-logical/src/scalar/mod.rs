//! Scalar expression trees.
//!
//! A [`ScalarOperator`] is a typed node with a closed set of kinds
//! ([`ScalarKind`]) and positionally owned children. Rewrite rules mutate
//! children by index or rebuild nodes; see `quarry-optimizer` for the
//! traversal that drives them.

mod builder;
mod case_when;
mod display;
mod operator;
mod types;

pub use case_when::CaseWhenLayout;
pub use operator::ScalarOperator;
pub use types::{BinaryType, CallOp, CompoundType, LikeType, ScalarKind, ScalarOp};
