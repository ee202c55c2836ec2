//! Declarative plan shape matching.

use quarry_logical::{OperatorType, OptExpression};

/// What a pattern node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Any single node; its subtree is unconstrained.
    Leaf,
    /// A node of exactly this operator type.
    Operator(OperatorType),
}

/// A tree of operator kinds used to test a rule's structural precondition.
///
/// A pattern with no children constrains only the node itself. A pattern with
/// children requires the node to have exactly that many inputs, each matching
/// the corresponding child pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    kind: PatternKind,
    children: Vec<Pattern>,
}

impl Pattern {
    /// Match a node of the given operator type.
    pub fn create(op: OperatorType) -> Self {
        Self {
            kind: PatternKind::Operator(op),
            children: Vec::new(),
        }
    }

    /// Match any node.
    pub fn leaf() -> Self {
        Self {
            kind: PatternKind::Leaf,
            children: Vec::new(),
        }
    }

    /// Set the child patterns.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Pattern>) -> Self {
        self.children = children;
        self
    }

    /// Append one child pattern.
    #[must_use]
    pub fn add_child(mut self, child: Pattern) -> Self {
        self.children.push(child);
        self
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn children(&self) -> &[Pattern] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == PatternKind::Leaf
    }

    /// Whether `expr` has this shape.
    pub fn matches(&self, expr: &OptExpression) -> bool {
        match self.kind {
            PatternKind::Leaf => true,
            PatternKind::Operator(op) => {
                expr.kind() == op
                    && (self.children.is_empty()
                        || (self.children.len() == expr.arity()
                            && self
                                .children
                                .iter()
                                .zip(expr.inputs())
                                .all(|(pattern, input)| pattern.matches(input))))
            }
        }
    }
}
