//! Plan tree node.

use common_display::{DisplayTree, TreeNode};

use crate::column::ColumnRef;

use super::{LogicalOperator, OperatorType};

/// A logical operator together with its owned input subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct OptExpression {
    op: LogicalOperator,
    inputs: Vec<OptExpression>,
}

impl OptExpression {
    /// Create a node with the given inputs.
    pub fn new(op: LogicalOperator, inputs: Vec<OptExpression>) -> Self {
        Self { op, inputs }
    }

    /// Create a node without inputs.
    pub fn leaf(op: LogicalOperator) -> Self {
        Self::new(op, Vec::new())
    }

    /// The operator at this node.
    pub fn op(&self) -> &LogicalOperator {
        &self.op
    }

    /// Operator kind at this node.
    pub fn kind(&self) -> OperatorType {
        self.op.operator_type()
    }

    /// Input `i`.
    pub fn input(&self, i: usize) -> Option<&OptExpression> {
        self.inputs.get(i)
    }

    /// All inputs.
    pub fn inputs(&self) -> &[OptExpression] {
        &self.inputs
    }

    /// Decompose into operator and inputs.
    pub fn into_parts(self) -> (LogicalOperator, Vec<OptExpression>) {
        (self.op, self.inputs)
    }

    /// Number of inputs.
    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// Count the number of operators in the tree.
    pub fn operator_count(&self) -> usize {
        1 + self.inputs.iter().map(Self::operator_count).sum::<usize>()
    }

    /// Get the maximum depth of the tree.
    pub fn depth(&self) -> usize {
        1 + self.inputs.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Check if any operator in the tree satisfies `predicate`.
    pub fn contains_op<F>(&self, predicate: F) -> bool
    where
        F: Fn(&LogicalOperator) -> bool,
    {
        fn check<F>(expr: &OptExpression, predicate: &F) -> bool
        where
            F: Fn(&LogicalOperator) -> bool,
        {
            predicate(&expr.op) || expr.inputs.iter().any(|i| check(i, predicate))
        }
        check(self, &predicate)
    }

    /// Columns produced by this subtree.
    pub fn output_columns(&self) -> Vec<ColumnRef> {
        let inputs: Vec<Vec<ColumnRef>> = self.inputs.iter().map(Self::output_columns).collect();
        self.op.output_columns(&inputs)
    }

    /// Generate a tree-formatted explanation of the plan.
    pub fn explain(&self) -> String {
        DisplayTree::new(self).to_string()
    }
}

impl TreeNode for OptExpression {
    fn name(&self) -> &str {
        self.kind().name()
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        self.inputs.iter().map(|i| i as &dyn TreeNode).collect()
    }

    fn details(&self) -> Option<String> {
        self.op.details()
    }
}

impl std::fmt::Display for OptExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", DisplayTree::new(self))
    }
}
