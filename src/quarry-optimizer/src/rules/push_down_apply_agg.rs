//! Push a correlated Filter below the Project under an aggregating Apply.
//!
//! ```text
//!     Apply                      Apply
//!    /     \                    /     \
//!  LEFT   Aggregate           LEFT   Aggregate
//!            |                          |
//!         Project        =>          Filter
//!            |                          |
//!         Filter                     Project
//!            |                          |
//!          Child                      Child
//! ```
//!
//! Later decorrelation turns a correlated Filter sitting directly above the
//! row source into a join condition; a Project above it hides it.

use common_error::{QuarryResult, internal_err};
use log::trace;
use quarry_logical::{LogicalOperator, OperatorType, OptExpression, ScalarOperator};

use crate::context::OptimizerContext;
use crate::pattern::Pattern;

use super::rule::{RuleType, TransformationRule};

/// Reorders `Apply(_, Agg(Project(Filter(X))))` into `Apply(_, Agg(Filter(Project'(X))))`.
///
/// Fires only on a correlated Apply whose aggregation is scalar, or on an
/// EXISTS / NOT EXISTS Apply.
pub struct PushDownApplyAggProjectFilterRule {
    pattern: Pattern,
}

impl PushDownApplyAggProjectFilterRule {
    pub fn new() -> Self {
        let pattern = Pattern::create(OperatorType::Apply).with_children(vec![
            Pattern::leaf(),
            Pattern::create(OperatorType::Aggregation).with_children(vec![
                Pattern::create(OperatorType::Project).with_children(vec![
                    Pattern::create(OperatorType::Filter).with_children(vec![Pattern::leaf()]),
                ]),
            ]),
        ]);
        Self { pattern }
    }
}

impl Default for PushDownApplyAggProjectFilterRule {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationRule for PushDownApplyAggProjectFilterRule {
    fn rule_type(&self) -> RuleType {
        RuleType::PushDownApplyAggProjectFilter
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn check(&self, expr: &OptExpression, _ctx: &OptimizerContext) -> bool {
        let Some(apply) = expr.op().as_apply() else {
            return false;
        };
        if !apply.is_correlated() {
            return false;
        }
        match expr.input(1).map(OptExpression::op) {
            Some(LogicalOperator::Aggregation { grouping_keys, .. }) => {
                grouping_keys.is_empty() || apply.is_existential()
            }
            _ => false,
        }
    }

    fn transform(
        &self,
        expr: &OptExpression,
        _ctx: &OptimizerContext,
    ) -> QuarryResult<Vec<OptExpression>> {
        let (Some(apply), [left, aggregate]) = (expr.op().as_apply(), expr.inputs()) else {
            internal_err!("expected Apply with two inputs, found {}", expr.kind().name());
        };
        let LogicalOperator::Aggregation {
            agg_type,
            grouping_keys,
            aggregations,
        } = aggregate.op()
        else {
            internal_err!("expected Aggregation under Apply, found {}", aggregate.kind().name());
        };
        let [project] = aggregate.inputs() else {
            internal_err!("Aggregation must have one input");
        };
        let LogicalOperator::Project { column_ref_map } = project.op() else {
            internal_err!("expected Project under Aggregation, found {}", project.kind().name());
        };
        let [filter] = project.inputs() else {
            internal_err!("Project must have one input");
        };
        let LogicalOperator::Filter { predicate } = filter.op() else {
            internal_err!("expected Filter under Project, found {}", filter.kind().name());
        };
        let [child] = filter.inputs() else {
            internal_err!("Filter must have one input");
        };

        // Correlation columns come from the outer scope; everything else the
        // filter reads must now pass through the Project.
        let mut column_ref_map = column_ref_map.clone();
        for column in predicate.column_refs() {
            if apply.correlation_column_refs.contains(&column) {
                continue;
            }
            column_ref_map.entry(column.clone()).or_insert_with(|| {
                trace!("Projecting {column} for pushed-down filter");
                ScalarOperator::column(column)
            });
        }

        let new_project =
            OptExpression::new(LogicalOperator::project(column_ref_map), vec![child.clone()]);
        let new_filter =
            OptExpression::new(LogicalOperator::filter(predicate.clone()), vec![new_project]);
        let new_aggregate = OptExpression::new(
            LogicalOperator::Aggregation {
                agg_type: *agg_type,
                grouping_keys: grouping_keys.clone(),
                aggregations: aggregations.clone(),
            },
            vec![new_filter],
        );
        let new_apply = OptExpression::new(
            LogicalOperator::Apply(apply.clone()),
            vec![left.clone(), new_aggregate],
        );

        Ok(vec![new_apply])
    }
}
