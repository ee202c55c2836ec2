//! Plan transformation rules and the dispatcher that applies them.
//!
//! # Rule Categories
//!
//! - **Scalar rewrites**: [`ScalarRewritePlanRule`] runs a scalar rewrite
//!   (implicit casts, predicate normalization) over each node's expressions
//! - **Structural rewrites**: [`PushDownApplyAggProjectFilterRule`] reorders
//!   operators under a correlated Apply
//!
//! Every rewrite must keep the plan's external shape contract: operator kinds,
//! input arity and the columns each operator produces.

mod optimizer;
mod push_down_apply_agg;
mod rule;
mod rule_set;
mod scalar_rewrite_plan_rule;

pub use optimizer::Optimizer;
pub use push_down_apply_agg::PushDownApplyAggProjectFilterRule;
pub use rule::{OptimizedPlan, RuleTrace, RuleType, TransformationRule, Transformed};
pub use rule_set::RuleSet;
pub use scalar_rewrite_plan_rule::ScalarRewritePlanRule;
