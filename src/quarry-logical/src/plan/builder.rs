use std::collections::BTreeMap;

use crate::column::ColumnRef;
use crate::scalar::ScalarOperator;

use super::{ApplyOperator, LogicalOperator, OptExpression};

/// Builder for constructing plans fluently, bottom-up.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    expr: OptExpression,
}

impl PlanBuilder {
    /// Start building from a scan.
    pub fn scan(table: impl Into<String>, columns: Vec<ColumnRef>) -> Self {
        Self::from_expr(OptExpression::leaf(LogicalOperator::scan(table, columns)))
    }

    /// Continue building on top of an existing subtree.
    pub fn from_expr(expr: OptExpression) -> Self {
        Self { expr }
    }

    fn push(self, op: LogicalOperator) -> Self {
        Self {
            expr: OptExpression::new(op, vec![self.expr]),
        }
    }

    /// Add a filter.
    pub fn filter(self, predicate: ScalarOperator) -> Self {
        self.push(LogicalOperator::filter(predicate))
    }

    /// Add a project.
    pub fn project(self, column_ref_map: BTreeMap<ColumnRef, ScalarOperator>) -> Self {
        self.push(LogicalOperator::project(column_ref_map))
    }

    /// Add a global aggregation.
    pub fn aggregate(
        self,
        grouping_keys: Vec<ColumnRef>,
        aggregations: BTreeMap<ColumnRef, ScalarOperator>,
    ) -> Self {
        self.push(LogicalOperator::aggregation(grouping_keys, aggregations))
    }

    /// Add a select over conjuncts.
    pub fn select(self, conjuncts: Vec<ScalarOperator>) -> Self {
        self.push(LogicalOperator::select(conjuncts))
    }

    /// Apply `subquery` to the current plan, which becomes the outer side.
    pub fn apply(self, subquery: OptExpression, apply: ApplyOperator) -> Self {
        Self {
            expr: OptExpression::new(LogicalOperator::Apply(apply), vec![self.expr, subquery]),
        }
    }

    /// Build the final plan.
    pub fn build(self) -> OptExpression {
        self.expr
    }
}
