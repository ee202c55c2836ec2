//! Operator payloads and kind tags.

use std::sync::Arc;

use quarry_core::{Function, Value};

use crate::column::ColumnRef;

use super::CaseWhenLayout;

/// Comparison operator of a binary predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryType {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// Null-safe equality `<=>`.
    EqForNull,
}

impl BinaryType {
    /// The operator that gives the same result with operands swapped.
    pub const fn commutative(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            other => other,
        }
    }

    /// The logical negation, if it is itself a comparison.
    ///
    /// `<=>` never yields NULL, so `NOT (a <=> b)` has no comparison form.
    pub const fn negative(self) -> Option<Self> {
        match self {
            Self::Eq => Some(Self::Ne),
            Self::Ne => Some(Self::Eq),
            Self::Lt => Some(Self::Ge),
            Self::Le => Some(Self::Gt),
            Self::Gt => Some(Self::Le),
            Self::Ge => Some(Self::Lt),
            Self::EqForNull => None,
        }
    }

    /// SQL symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::EqForNull => "<=>",
        }
    }
}

impl std::fmt::Display for BinaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Logical connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundType {
    And,
    Or,
    Not,
}

impl std::fmt::Display for CompoundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::Not => write!(f, "NOT"),
        }
    }
}

/// Pattern-matching predicate flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeType {
    Like,
    Regexp,
}

impl std::fmt::Display for LikeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Like => write!(f, "LIKE"),
            Self::Regexp => write!(f, "REGEXP"),
        }
    }
}

/// Function call payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOp {
    /// Function name as written.
    pub fn_name: String,
    /// Resolved signature. `None` when no overload matched the arguments.
    pub function: Option<Arc<Function>>,
}

/// Kind-specific payload of a scalar operator.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarOp {
    /// Literal value.
    Constant(Value),
    /// Column reference.
    ColumnRef(ColumnRef),
    /// Function call; children are the arguments.
    Call(CallOp),
    /// Comparison; children are `[left, right]`.
    BinaryPredicate(BinaryType),
    /// AND / OR over two children, NOT over one.
    CompoundPredicate(CompoundType),
    /// Children are `[value, list...]`.
    InPredicate { negated: bool },
    /// Children are `[value, low, high]`.
    BetweenPredicate { negated: bool },
    /// Children are `[value, pattern]`.
    LikePredicate(LikeType),
    /// One child.
    IsNullPredicate { negated: bool },
    /// Existential test over a subquery.
    Exists { negated: bool },
    /// CASE expression; see [`CaseWhenLayout`] for the child partition.
    CaseWhen(CaseWhenLayout),
    /// Conversion of the single child to the node's type.
    Cast { implicit: bool },
}

impl ScalarOp {
    /// The fieldless kind tag.
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Constant(_) => ScalarKind::Constant,
            Self::ColumnRef(_) => ScalarKind::ColumnRef,
            Self::Call(_) => ScalarKind::Call,
            Self::BinaryPredicate(_) => ScalarKind::BinaryPredicate,
            Self::CompoundPredicate(_) => ScalarKind::CompoundPredicate,
            Self::InPredicate { .. } => ScalarKind::InPredicate,
            Self::BetweenPredicate { .. } => ScalarKind::BetweenPredicate,
            Self::LikePredicate(_) => ScalarKind::LikePredicate,
            Self::IsNullPredicate { .. } => ScalarKind::IsNullPredicate,
            Self::Exists { .. } => ScalarKind::Exists,
            Self::CaseWhen(_) => ScalarKind::CaseWhen,
            Self::Cast { .. } => ScalarKind::Cast,
        }
    }
}

/// Closed set of scalar operator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Constant,
    ColumnRef,
    Call,
    BinaryPredicate,
    CompoundPredicate,
    InPredicate,
    BetweenPredicate,
    LikePredicate,
    IsNullPredicate,
    Exists,
    CaseWhen,
    Cast,
}
