//! Constructors for scalar operators.

use std::sync::Arc;

use common_error::{QuarryResult, ensure};
use quarry_core::{DataType, Function, Value};

use crate::column::ColumnRef;

use super::{
    BinaryType, CallOp, CaseWhenLayout, CompoundType, LikeType, ScalarOp, ScalarOperator,
};

impl ScalarOperator {
    /// Literal of the value's natural type.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        let data_type = value.data_type();
        Self::new(ScalarOp::Constant(value), data_type, Vec::new())
    }

    /// Literal with an explicit declared type.
    pub fn typed_constant(value: Value, data_type: DataType) -> Self {
        Self::new(ScalarOp::Constant(value), data_type, Vec::new())
    }

    /// NULL literal of the given type.
    pub fn null_of(data_type: DataType) -> Self {
        Self::typed_constant(Value::Null, data_type)
    }

    /// Column reference.
    pub fn column(column: ColumnRef) -> Self {
        let data_type = column.data_type.clone();
        Self::new(ScalarOp::ColumnRef(column), data_type, Vec::new())
    }

    /// Unresolved function call.
    pub fn call(fn_name: impl Into<String>, return_type: DataType, args: Vec<Self>) -> Self {
        let call = CallOp {
            fn_name: fn_name.into(),
            function: None,
        };
        Self::new(ScalarOp::Call(call), return_type, args)
    }

    /// Call bound to a resolved signature.
    pub fn call_resolved(function: Arc<Function>, args: Vec<Self>) -> Self {
        let return_type = function.return_type.clone();
        let call = CallOp {
            fn_name: function.name.clone(),
            function: Some(function),
        };
        Self::new(ScalarOp::Call(call), return_type, args)
    }

    /// Binary comparison.
    pub fn binary(op: BinaryType, left: Self, right: Self) -> Self {
        Self::new(ScalarOp::BinaryPredicate(op), DataType::Boolean, vec![left, right])
    }

    /// `left AND right`
    pub fn and(left: Self, right: Self) -> Self {
        Self::compound(CompoundType::And, vec![left, right])
    }

    /// `left OR right`
    pub fn or(left: Self, right: Self) -> Self {
        Self::compound(CompoundType::Or, vec![left, right])
    }

    /// `NOT child`
    pub fn not(child: Self) -> Self {
        Self::compound(CompoundType::Not, vec![child])
    }

    fn compound(op: CompoundType, children: Vec<Self>) -> Self {
        Self::new(ScalarOp::CompoundPredicate(op), DataType::Boolean, children)
    }

    /// `value [NOT] IN (list...)`
    pub fn in_list(value: Self, list: Vec<Self>, negated: bool) -> Self {
        let mut children = Vec::with_capacity(list.len() + 1);
        children.push(value);
        children.extend(list);
        Self::new(ScalarOp::InPredicate { negated }, DataType::Boolean, children)
    }

    /// `value [NOT] BETWEEN low AND high`
    pub fn between(value: Self, low: Self, high: Self, negated: bool) -> Self {
        Self::new(
            ScalarOp::BetweenPredicate { negated },
            DataType::Boolean,
            vec![value, low, high],
        )
    }

    /// `value LIKE pattern` or `value REGEXP pattern`.
    pub fn like(like_type: LikeType, value: Self, pattern: Self) -> Self {
        Self::new(ScalarOp::LikePredicate(like_type), DataType::Boolean, vec![value, pattern])
    }

    /// `child IS [NOT] NULL`
    pub fn is_null(child: Self, negated: bool) -> Self {
        Self::new(ScalarOp::IsNullPredicate { negated }, DataType::Boolean, vec![child])
    }

    /// `[NOT] EXISTS (subquery)`; the subquery itself lives in the plan.
    pub fn exists(negated: bool) -> Self {
        Self::new(ScalarOp::Exists { negated }, DataType::Boolean, Vec::new())
    }

    /// CASE expression.
    ///
    /// `when_then` holds alternating WHEN and THEN clauses and must be a
    /// non-empty, even-length run.
    pub fn case_when(
        return_type: DataType,
        case: Option<Self>,
        when_then: Vec<Self>,
        else_clause: Option<Self>,
    ) -> QuarryResult<Self> {
        ensure!(
            !when_then.is_empty() && when_then.len() % 2 == 0,
            InternalError: "CASE needs WHEN/THEN pairs, got {} clauses",
            when_then.len()
        );

        let layout =
            CaseWhenLayout::new(case.is_some(), when_then.len() / 2, else_clause.is_some());
        let mut children = Vec::with_capacity(layout.num_children());
        children.extend(case);
        children.extend(when_then);
        children.extend(else_clause);
        Ok(Self::new(ScalarOp::CaseWhen(layout), return_type, children))
    }

    /// `cast(child AS data_type)`
    pub fn cast(child: Self, data_type: DataType, implicit: bool) -> Self {
        Self::new(ScalarOp::Cast { implicit }, data_type, vec![child])
    }

    // Comparison builders

    /// `self = other`
    pub fn equal(self, other: Self) -> Self {
        Self::binary(BinaryType::Eq, self, other)
    }

    /// `self != other`
    pub fn not_equal(self, other: Self) -> Self {
        Self::binary(BinaryType::Ne, self, other)
    }

    /// `self < other`
    pub fn lt(self, other: Self) -> Self {
        Self::binary(BinaryType::Lt, self, other)
    }

    /// `self <= other`
    pub fn le(self, other: Self) -> Self {
        Self::binary(BinaryType::Le, self, other)
    }

    /// `self > other`
    pub fn gt(self, other: Self) -> Self {
        Self::binary(BinaryType::Gt, self, other)
    }

    /// `self >= other`
    pub fn ge(self, other: Self) -> Self {
        Self::binary(BinaryType::Ge, self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_when_partition() {
        let a = ScalarOperator::column(ColumnRef::new(1, "a", DataType::Int));
        let case = ScalarOperator::case_when(
            DataType::Double,
            Some(a),
            vec![
                ScalarOperator::constant(1i32),
                ScalarOperator::constant(1.5f64),
                ScalarOperator::constant(2i32),
                ScalarOperator::constant(2.5f64),
            ],
            Some(ScalarOperator::constant(0.0f64)),
        )
        .unwrap();

        assert_eq!(case.num_children(), 6);
        assert_eq!(case.when_clause_size().unwrap(), 2);
        assert!(case.case_clause().unwrap().is_column_ref());
        assert_eq!(case.when_clause(1).unwrap().as_constant(), Some(&Value::Int(2)));
        assert_eq!(case.then_clause(1).unwrap().as_constant(), Some(&Value::Double(2.5)));
        assert_eq!(case.else_clause().unwrap().as_constant(), Some(&Value::Double(0.0)));
        assert!(case.when_clause(2).is_err());
    }

    #[test]
    fn test_case_when_rejects_odd_clauses() {
        let err = ScalarOperator::case_when(
            DataType::Int,
            None,
            vec![ScalarOperator::constant(true)],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, common_error::QuarryError::InternalError(_)));
        assert!(ScalarOperator::case_when(DataType::Int, None, vec![], None).is_err());
    }

    #[test]
    fn test_resolved_call_takes_signature_type() {
        let abs = Arc::new(Function::new("abs", vec![DataType::Double], DataType::Double));
        let call = ScalarOperator::call_resolved(abs, vec![ScalarOperator::constant(1.0f64)]);
        assert_eq!(call.data_type(), &DataType::Double);
        assert_eq!(call.call_op().unwrap().fn_name, "abs");
        assert!(call.call_op().unwrap().function.is_some());
    }

    #[test]
    fn test_in_list_children() {
        let a = ScalarOperator::column(ColumnRef::new(1, "a", DataType::Int));
        let pred = ScalarOperator::in_list(
            a,
            vec![ScalarOperator::constant(1i32), ScalarOperator::constant(2i32)],
            false,
        );
        assert_eq!(pred.num_children(), 3);
        assert_eq!(pred.data_type(), &DataType::Boolean);
    }
}
