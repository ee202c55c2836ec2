//! Implicit type coercion.
//!
//! Makes every operator's children carry the type its semantics require by
//! inserting explicit CAST nodes, or by re-typing literals at plan time when
//! that is lossless.
//!
//! ```text
//!         =                        =
//!       /   \                    /   \
//!  s(VARCHAR) 5(INT)   =>   cast(s)  cast(5)
//!                           DOUBLE   DOUBLE
//! ```

use common_error::QuarryResult;
use log::trace;
use quarry_core::{Catalog, DataType};
use quarry_logical::ScalarOperator;

use super::visitor::{ScalarRewriteContext, ScalarRewriteRule};

/// Inserts casts where children's types differ from what their parent needs.
///
/// Runs top-down: a parent decides the target type and wraps the child by
/// index before the traversal descends into it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicitCastRule;

impl ScalarRewriteRule for ImplicitCastRule {
    fn name(&self) -> &'static str {
        "ImplicitCastRule"
    }

    fn visit_call(
        &self,
        mut call: ScalarOperator,
        _ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        let Some(function) = call.call_op().and_then(|c| c.function.clone()) else {
            // Unresolved: every argument takes the call's own type.
            let return_type = call.data_type().clone();
            for i in 0..call.num_children() {
                if !return_type.matches_type(call.child(i)?.data_type()) {
                    add_cast_child(&mut call, i, &return_type)?;
                }
            }
            return Ok(call);
        };

        for (i, param) in function.arg_types.iter().enumerate().take(call.num_children()) {
            let arg_type = call.child(i)?.data_type();

            // An untyped array literal takes the parameter type directly so
            // no NULL-typed array reaches execution.
            if param.is_array() && arg_type.item_type().is_some_and(DataType::is_null) {
                call.map_child(i, |mut arg| {
                    arg.set_type(param.clone());
                    arg
                })?;
                continue;
            }

            if !param.matches_type(arg_type) {
                add_cast_child(&mut call, i, param)?;
            }
        }

        if let Some(var_arg_type) = &function.var_arg_type {
            for i in function.num_args()..call.num_children() {
                if !var_arg_type.matches_type(call.child(i)?.data_type()) {
                    add_cast_child(&mut call, i, var_arg_type)?;
                }
            }
        }

        Ok(call)
    }

    fn visit_binary_predicate(
        &self,
        mut predicate: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        let left = predicate.child(0)?;
        let right = predicate.child(1)?;
        let left_type = left.data_type().clone();
        let right_type = right.data_type().clone();

        if left_type.matches_type(&right_type) {
            return Ok(predicate);
        }

        // Prefer re-typing the literal over casting the column.
        let folded = if right.is_variable() && left.is_constant_ref() {
            try_cast_constant(left, &right_type, ctx.catalog).map(|c| (0, c))
        } else if left.is_variable() && right.is_constant_ref() {
            try_cast_constant(right, &left_type, ctx.catalog).map(|c| (1, c))
        } else {
            None
        };
        if let Some((i, constant)) = folded {
            predicate.set_child(i, constant)?;
            return Ok(predicate);
        }

        let compatible = ctx.catalog.compatible_type_for_binary(&left_type, &right_type)?;
        if !left_type.matches_type(&compatible) {
            add_cast_child(&mut predicate, 0, &compatible)?;
        }
        if !right_type.matches_type(&compatible) {
            add_cast_child(&mut predicate, 1, &compatible)?;
        }
        Ok(predicate)
    }

    fn visit_compound_predicate(
        &self,
        mut predicate: ScalarOperator,
        _ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        for i in 0..predicate.num_children() {
            if !DataType::Boolean.matches_type(predicate.child(i)?.data_type()) {
                add_cast_child(&mut predicate, i, &DataType::Boolean)?;
            }
        }
        Ok(predicate)
    }

    fn visit_in_predicate(
        &self,
        predicate: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        cast_for_between_and_in(predicate, ctx)
    }

    fn visit_between_predicate(
        &self,
        predicate: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        cast_for_between_and_in(predicate, ctx)
    }

    fn visit_like_predicate(
        &self,
        mut predicate: ScalarOperator,
        _ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        for i in 0..2 {
            if !predicate.child(i)?.data_type().is_string() {
                add_cast_child(&mut predicate, i, &DataType::Varchar)?;
            }
        }
        Ok(predicate)
    }

    fn visit_case_when(
        &self,
        mut case: ScalarOperator,
        ctx: &ScalarRewriteContext<'_>,
    ) -> QuarryResult<ScalarOperator> {
        let Some(layout) = case.case_when_layout() else {
            return Ok(case);
        };
        let return_type = case.data_type().clone();

        if let Some(i) = layout.else_index() {
            if !return_type.matches_type(case.child(i)?.data_type()) {
                add_cast_child(&mut case, i, &return_type)?;
            }
        }
        for i in 0..layout.when_clause_size() {
            let then_index = layout.then_index(i);
            if !return_type.matches_type(case.child(then_index)?.data_type()) {
                add_cast_child(&mut case, then_index, &return_type)?;
            }
        }

        // Searched CASE: WHEN clauses are conditions and stay as they are.
        let Some(case_index) = layout.case_index() else {
            return Ok(case);
        };

        let mut types = vec![case.child(case_index)?.data_type().clone()];
        for i in 0..layout.when_clause_size() {
            types.push(case.child(layout.when_index(i))?.data_type().clone());
        }
        let compatible = ctx.catalog.compatible_type_for_case_when(&types)?;

        if !compatible.matches_type(&types[0]) {
            add_cast_child(&mut case, case_index, &compatible)?;
        }
        for i in 0..layout.when_clause_size() {
            if !compatible.matches_type(&types[i + 1]) {
                add_cast_child(&mut case, layout.when_index(i), &compatible)?;
            }
        }
        Ok(case)
    }
}

/// Shared coercion for `v [NOT] BETWEEN lo AND hi` and `v [NOT] IN (...)`.
fn cast_for_between_and_in(
    mut predicate: ScalarOperator,
    ctx: &ScalarRewriteContext<'_>,
) -> QuarryResult<ScalarOperator> {
    let first_type = predicate.child(0)?.data_type().clone();
    let rest = &predicate.children()[1..];
    if rest.iter().all(|c| first_type.matches_type(c.data_type())) {
        return Ok(predicate);
    }

    if predicate.child(0)?.is_variable() && rest.iter().all(ScalarOperator::is_constant_ref) {
        // All or nothing: one literal that cannot be re-typed, including one
        // that already has the operand's type, sends every operand down the
        // widening path.
        let folded: Option<Vec<ScalarOperator>> = rest
            .iter()
            .map(|c| try_cast_constant(c, &first_type, ctx.catalog))
            .collect();

        if let Some(folded) = folded {
            for (i, constant) in folded.into_iter().enumerate() {
                predicate.set_child(i + 1, constant)?;
            }
            return Ok(predicate);
        }
    }

    let types: Vec<DataType> = predicate.children().iter().map(|c| c.data_type().clone()).collect();
    let compatible = ctx.catalog.compatible_type_for_between_and_in(&types)?;
    for (i, ty) in types.iter().enumerate() {
        if !ty.matches_type(&compatible) {
            add_cast_child(&mut predicate, i, &compatible)?;
        }
    }
    Ok(predicate)
}

fn add_cast_child(node: &mut ScalarOperator, i: usize, data_type: &DataType) -> QuarryResult<()> {
    node.map_child(i, |child| ScalarOperator::cast(child, data_type.clone(), true))
}

/// Re-type a literal into `dest` at plan time, if that is lossless.
///
/// Returns `None` when the operand is not a literal, already has a matching
/// type, either side is FLOAT, evaluation fails, or the evaluated literal's
/// text differs (ignoring case) from the original's. A NULL literal becomes
/// a NULL of `dest`.
pub fn try_cast_constant(
    op: &ScalarOperator,
    dest: &DataType,
    catalog: &dyn Catalog,
) -> Option<ScalarOperator> {
    let value = op.as_constant()?;
    let source = op.data_type();
    // FLOAT round-trips are lossy and change comparison results.
    if source.matches_type(dest) || *source == DataType::Float || *dest == DataType::Float {
        return None;
    }

    if value.is_null() {
        return Some(ScalarOperator::null_of(dest.clone()));
    }

    match catalog.cast_literal(value, dest) {
        Ok(result) => {
            let (original, folded) = (value.to_string(), result.to_string());
            if original.to_lowercase() == folded.to_lowercase() {
                Some(ScalarOperator::typed_constant(result, dest.clone()))
            } else {
                trace!("Constant fold of {original} to {dest} rejected: yields {folded}");
                None
            }
        }
        Err(e) => {
            trace!("Constant fold of {value} to {dest} rejected: {e}");
            None
        }
    }
}
