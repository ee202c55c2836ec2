//! Plan validation.
//!
//! Checks the invariants every rewrite must preserve:
//!
//! - each operator has the number of inputs its kind requires
//! - every column an operator's expressions use is produced by one of its
//!   inputs, or is a correlation reference visible from an enclosing Apply

use common_error::{QuarryError, QuarryResult};

use crate::column::ColumnRef;
use crate::plan::{LogicalOperator, OptExpression};

/// Validate a whole plan.
pub fn validate_plan(plan: &OptExpression) -> QuarryResult<()> {
    validate(plan, &[]).map(|_| ())
}

/// Validate `expr` with `outer` visible as correlation scope, returning the
/// columns it produces.
fn validate(expr: &OptExpression, outer: &[ColumnRef]) -> QuarryResult<Vec<ColumnRef>> {
    let kind = expr.kind();
    if expr.arity() != kind.arity() {
        return Err(QuarryError::schema_error(format!(
            "{kind} expects {} inputs, found {}",
            kind.arity(),
            expr.arity()
        )));
    }

    let input_columns = match expr.op() {
        LogicalOperator::Apply(apply) => {
            let left = validate(&expr.inputs()[0], outer)?;
            for column in &apply.correlation_column_refs {
                if !left.contains(column) && !outer.contains(column) {
                    return Err(not_found(column, &format!("{kind} correlation")));
                }
            }

            let mut scope = outer.to_vec();
            scope.extend(apply.correlation_column_refs.iter().cloned());
            let right = validate(&expr.inputs()[1], &scope)?;
            vec![left, right]
        }
        _ => expr
            .inputs()
            .iter()
            .map(|input| validate(input, outer))
            .collect::<QuarryResult<Vec<_>>>()?,
    };

    let visible = |column: &ColumnRef| {
        outer.contains(column) || input_columns.iter().any(|cols| cols.contains(column))
    };

    if let LogicalOperator::Aggregation { grouping_keys, .. } = expr.op() {
        if let Some(key) = grouping_keys.iter().find(|k| !visible(*k)) {
            return Err(not_found(key, &format!("{kind} grouping key")));
        }
    }

    for expression in expr.op().expressions() {
        if let Some(column) = expression.column_refs().iter().find(|c| !visible(*c)) {
            return Err(not_found(column, kind.name()));
        }
    }

    Ok(expr.op().output_columns(&input_columns))
}

fn not_found(column: &ColumnRef, used_by: &str) -> QuarryError {
    QuarryError::column_not_found(format!(
        "{}#{} used by {used_by} is not produced by its inputs",
        column.name, column.id
    ))
}
