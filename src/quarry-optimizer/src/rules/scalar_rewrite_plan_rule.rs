//! Plan-level adapter for scalar rewrite rules.

use common_error::QuarryResult;
use quarry_logical::OptExpression;

use crate::context::OptimizerContext;
use crate::pattern::Pattern;
use crate::rewrite::{
    ImplicitCastRule, NormalizePredicateRule, RewriteOrder, ScalarOperatorRewriter,
    ScalarRewriteContext,
};

use super::rule::{RuleType, TransformationRule};

/// Runs a [`ScalarOperatorRewriter`] over every expression a plan node owns.
///
/// Matches any node. Expressions inside the node's inputs are left for the
/// dispatcher to reach when it visits those inputs. Returns no alternative
/// when nothing changed, so repeated passes reach a fixpoint.
pub struct ScalarRewritePlanRule {
    rule_type: RuleType,
    pattern: Pattern,
    rewriter: ScalarOperatorRewriter,
}

impl ScalarRewritePlanRule {
    pub fn new(rule_type: RuleType, rewriter: ScalarOperatorRewriter) -> Self {
        Self {
            rule_type,
            pattern: Pattern::leaf(),
            rewriter,
        }
    }

    /// Top-down [`ImplicitCastRule`].
    pub fn implicit_cast() -> Self {
        Self::new(
            RuleType::ImplicitCast,
            ScalarOperatorRewriter::new().with_rule(ImplicitCastRule, RewriteOrder::TopDown),
        )
    }

    /// Bottom-up [`NormalizePredicateRule`].
    pub fn normalize_predicate() -> Self {
        Self::new(
            RuleType::NormalizePredicate,
            ScalarOperatorRewriter::new().with_rule(NormalizePredicateRule, RewriteOrder::BottomUp),
        )
    }
}

impl TransformationRule for ScalarRewritePlanRule {
    fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn check(&self, expr: &OptExpression, _ctx: &OptimizerContext) -> bool {
        !expr.op().expressions().is_empty()
    }

    fn transform(
        &self,
        expr: &OptExpression,
        ctx: &OptimizerContext,
    ) -> QuarryResult<Vec<OptExpression>> {
        let scalar_ctx = ScalarRewriteContext::new(ctx.catalog.as_ref());
        // The dispatcher hands out a shared node; rewriting needs an owned copy.
        let rewritten = expr
            .op()
            .clone()
            .map_expressions(|e| self.rewriter.rewrite(e, &scalar_ctx))?;

        if rewritten == *expr.op() {
            return Ok(Vec::new());
        }
        Ok(vec![OptExpression::new(rewritten, expr.inputs().to_vec())])
    }
}
