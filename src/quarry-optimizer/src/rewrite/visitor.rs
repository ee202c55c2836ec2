//! Per-kind scalar rewrite dispatch and tree traversal.

use common_error::{QuarryResult, internal_err};
use log::debug;
use quarry_core::Catalog;
use quarry_logical::{ScalarKind, ScalarOperator};

/// Read-only handle passed to every scalar rewrite.
#[derive(Clone, Copy)]
pub struct ScalarRewriteContext<'a> {
    pub catalog: &'a dyn Catalog,
}

impl<'a> ScalarRewriteContext<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog }
    }
}

/// A rewrite over scalar operators, one method per kind.
///
/// Every `visit_*` method defaults to [`visit`](Self::visit), which returns
/// the node unchanged. Rules override only the kinds they care about; the
/// traversal takes care of the children.
pub trait ScalarRewriteRule: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn visit(
        &self,
        op: ScalarOperator,
        _ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        Ok(op)
    }

    fn visit_constant(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_column_ref(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_call(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_binary_predicate(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_compound_predicate(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_in_predicate(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_between_predicate(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_like_predicate(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_is_null_predicate(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_exists(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_case_when(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }

    fn visit_cast(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.visit(op, ctx)
    }
}

/// Route `op` to the rule method for its kind.
pub fn dispatch(
    rule: &dyn ScalarRewriteRule,
    op: ScalarOperator,
    ctx: &ScalarRewriteContext<'_>,
) -> QuarryResult<ScalarOperator> {
    match op.kind() {
        ScalarKind::Constant => rule.visit_constant(op, ctx),
        ScalarKind::ColumnRef => rule.visit_column_ref(op, ctx),
        ScalarKind::Call => rule.visit_call(op, ctx),
        ScalarKind::BinaryPredicate => rule.visit_binary_predicate(op, ctx),
        ScalarKind::CompoundPredicate => rule.visit_compound_predicate(op, ctx),
        ScalarKind::InPredicate => rule.visit_in_predicate(op, ctx),
        ScalarKind::BetweenPredicate => rule.visit_between_predicate(op, ctx),
        ScalarKind::LikePredicate => rule.visit_like_predicate(op, ctx),
        ScalarKind::IsNullPredicate => rule.visit_is_null_predicate(op, ctx),
        ScalarKind::Exists => rule.visit_exists(op, ctx),
        ScalarKind::CaseWhen => rule.visit_case_when(op, ctx),
        ScalarKind::Cast => rule.visit_cast(op, ctx),
    }
}

/// Where a rule runs relative to the children of the node it visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOrder {
    /// Rule runs on a node, then the traversal descends into the result's
    /// children. Casts a parent inserts are visited as children.
    TopDown,
    /// Children are rewritten first, so the rule sees stable operands.
    BottomUp,
}

/// Applies an ordered list of scalar rules to an expression tree.
#[derive(Default)]
pub struct ScalarOperatorRewriter {
    rules: Vec<(Box<dyn ScalarRewriteRule>, RewriteOrder)>,
}

impl ScalarOperatorRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn with_rule(
        mut self,
        rule: impl ScalarRewriteRule + 'static,
        order: RewriteOrder,
    ) -> Self {
        self.push(Box::new(rule), order);
        self
    }

    /// Append a boxed rule.
    pub fn push(&mut self, rule: Box<dyn ScalarRewriteRule>, order: RewriteOrder) {
        self.rules.push((rule, order));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule once over the whole tree, in order.
    pub fn rewrite(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        self.rules.iter().try_fold(op, |op, (rule, order)| match order {
            RewriteOrder::TopDown => rewrite_top_down(&**rule, op, ctx),
            RewriteOrder::BottomUp => rewrite_bottom_up(&**rule, op, ctx),
        })
    }

    /// Repeat [`rewrite`](Self::rewrite) until the tree stops changing.
    ///
    /// Running out of `budget` passes is an internal error: the rules are
    /// expected to converge.
    pub fn rewrite_to_fixpoint(
        &self,
        op: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
        budget: usize,
    ) -> QuarryResult<ScalarOperator> {
        let mut current = op;
        for pass in 1..=budget {
            let next = self.rewrite(current.clone(), ctx)?;
            if next == current {
                debug!("Scalar rewrite reached fixpoint after {pass} passes");
                return Ok(next);
            }
            current = next;
        }
        internal_err!("scalar rewrite did not converge within {budget} passes: {current}")
    }
}

fn rewrite_top_down(
    rule: &dyn ScalarRewriteRule,
    op: ScalarOperator,
    ctx: &ScalarRewriteContext<'_>,
) -> QuarryResult<ScalarOperator> {
    let op = dispatch(rule, op, ctx)?;
    op.map_children(|child| rewrite_top_down(rule, child, ctx))
}

fn rewrite_bottom_up(
    rule: &dyn ScalarRewriteRule,
    op: ScalarOperator,
    ctx: &ScalarRewriteContext<'_>,
) -> QuarryResult<ScalarOperator> {
    let op = op.map_children(|child| rewrite_bottom_up(rule, child, ctx))?;
    dispatch(rule, op, ctx)
}
