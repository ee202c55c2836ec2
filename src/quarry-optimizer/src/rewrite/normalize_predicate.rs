//! Predicate normalization.

use common_error::{QuarryError, QuarryResult, internal_err};
use quarry_logical::{BinaryType, CompoundType, ScalarOp, ScalarOperator};

use super::visitor::{ScalarRewriteContext, ScalarRewriteRule};

/// Puts comparisons into a canonical form.
///
/// - `5 < a` becomes `a > 5`
/// - `NOT (a = 1)` becomes `a != 1`
/// - `a IN (1)` becomes `a = 1`
///
/// Runs bottom-up so a parent sees already-normalized operands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizePredicateRule;

impl ScalarRewriteRule for NormalizePredicateRule {
    fn name(&self) -> &'static str {
        "NormalizePredicateRule"
    }

    fn visit_binary_predicate(
        &self,
        predicate: ScalarOperator,
        _ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        let ScalarOp::BinaryPredicate(op) = *predicate.op() else {
            return Ok(predicate);
        };
        if !(predicate.child(0)?.is_constant() && predicate.child(1)?.is_variable()) {
            return Ok(predicate);
        }

        let (_, _, children) = predicate.into_parts();
        let [left, right] = two(children)?;
        Ok(ScalarOperator::binary(op.commutative(), right, left))
    }

    fn visit_compound_predicate(
        &self,
        predicate: ScalarOperator,
        _ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        if !matches!(predicate.op(), ScalarOp::CompoundPredicate(CompoundType::Not)) {
            return Ok(predicate);
        }
        let negated = match predicate.child(0)?.op() {
            ScalarOp::BinaryPredicate(op) => op.negative(),
            _ => None,
        };
        let Some(negated) = negated else {
            return Ok(predicate);
        };

        let (_, _, children) = predicate.into_parts();
        let Some(comparison) = children.into_iter().next() else {
            internal_err!("NOT without operand");
        };
        let (_, _, operands) = comparison.into_parts();
        let [left, right] = two(operands)?;
        Ok(ScalarOperator::binary(negated, left, right))
    }

    fn visit_in_predicate(
        &self,
        predicate: ScalarOperator,
        _ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        let ScalarOp::InPredicate { negated } = *predicate.op() else {
            return Ok(predicate);
        };
        if predicate.num_children() != 2 {
            return Ok(predicate);
        }

        let (_, _, children) = predicate.into_parts();
        let [value, item] = two(children)?;
        let op = if negated { BinaryType::Ne } else { BinaryType::Eq };
        Ok(ScalarOperator::binary(op, value, item))
    }
}

fn two(children: Vec<ScalarOperator>) -> QuarryResult<[ScalarOperator; 2]> {
    <[ScalarOperator; 2]>::try_from(children)
        .map_err(|c| QuarryError::internal(format!("expected 2 operands, found {}", c.len())))
}
