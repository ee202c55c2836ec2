//! Scalar expression rewriting.
//!
//! [`ScalarOperatorRewriter`] walks a scalar tree and hands each node to a
//! [`ScalarRewriteRule`] by kind. The concrete rules here are wrapped for plan
//! use by [`ScalarRewritePlanRule`](crate::rules::ScalarRewritePlanRule).

mod implicit_cast;
mod normalize_predicate;
mod visitor;

pub use implicit_cast::{ImplicitCastRule, try_cast_constant};
pub use normalize_predicate::NormalizePredicateRule;
pub use visitor::{
    RewriteOrder, ScalarOperatorRewriter, ScalarRewriteContext, ScalarRewriteRule, dispatch,
};
