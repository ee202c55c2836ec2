//! Rule-based rewrite core for Quarry logical plans.
//!
//! The [`Optimizer`] repeatedly walks an [`OptExpression`], matching each
//! node against the [`Pattern`] of every registered [`TransformationRule`].
//! Rules that match and pass their guard replace the node.
//!
//! ```
//! use std::sync::Arc;
//!
//! use quarry_core::{BuiltinCatalog, DataType};
//! use quarry_logical::{ColumnRef, PlanBuilder, ScalarOperator};
//!
//! let s = ColumnRef::new(1, "s", DataType::Varchar);
//! let plan = PlanBuilder::scan("t", vec![s.clone()])
//!     .filter(ScalarOperator::column(s).equal(ScalarOperator::constant(5i32)))
//!     .build();
//!
//! let optimized = quarry_optimizer::optimize(plan, Arc::new(BuiltinCatalog::with_builtins())).unwrap();
//! assert!(optimized.explain().contains("cast(s AS DOUBLE) = cast(5 AS DOUBLE)"));
//! ```

mod context;
mod pattern;
pub mod rewrite;
pub mod rules;

use std::sync::Arc;

pub use context::OptimizerContext;
pub use pattern::{Pattern, PatternKind};
pub use rules::{
    OptimizedPlan, Optimizer, PushDownApplyAggProjectFilterRule, RuleSet, RuleTrace, RuleType,
    ScalarRewritePlanRule, TransformationRule, Transformed,
};

use common_error::QuarryResult;
use quarry_core::Catalog;
use quarry_logical::OptExpression;

/// Optimize a plan with the default rules and configuration.
pub fn optimize(plan: OptExpression, catalog: Arc<dyn Catalog>) -> QuarryResult<OptExpression> {
    let ctx = OptimizerContext::new(catalog);
    let optimizer = Optimizer::default();
    Ok(optimizer.optimize(plan, &ctx)?.plan)
}
