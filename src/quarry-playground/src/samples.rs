//! Hand-built sample plans.

use std::collections::BTreeMap;

use common_error::QuarryResult;
use quarry_core::DataType;
use quarry_logical::{ApplyOperator, ColumnRefFactory, OptExpression, PlanBuilder, ScalarOperator};

/// `SELECT * FROM t WHERE stringColumn = 5`
pub fn cast_plan() -> OptExpression {
    let mut columns = ColumnRefFactory::new();
    let s = columns.create("stringColumn", DataType::Varchar);
    let id = columns.create("id", DataType::BigInt);

    PlanBuilder::scan("t", vec![id, s.clone()])
        .filter(ScalarOperator::column(s).equal(ScalarOperator::constant(5i32)))
        .build()
}

/// `SELECT CASE WHEN a > 0 THEN 1 WHEN a < 0 THEN 2.5 ELSE 0 END FROM t`
pub fn case_when_plan() -> QuarryResult<OptExpression> {
    let mut columns = ColumnRefFactory::new();
    let a = columns.create("a", DataType::Int);
    let result = columns.create("r", DataType::Double);

    let case = ScalarOperator::case_when(
        DataType::Double,
        None,
        vec![
            ScalarOperator::column(a.clone()).gt(ScalarOperator::constant(0i32)),
            ScalarOperator::constant(1i32),
            ScalarOperator::column(a.clone()).lt(ScalarOperator::constant(0i32)),
            ScalarOperator::constant(2.5f64),
        ],
        Some(ScalarOperator::constant(0i32)),
    )?;

    let mut projection = BTreeMap::new();
    projection.insert(result, case);
    Ok(PlanBuilder::scan("t", vec![a]).project(projection).build())
}

/// A correlated scalar subquery:
///
/// ```sql
/// SELECT o.id, (SELECT sum(l.qty) * 2 FROM lineitem l
///               WHERE l.order_id = o.id AND l.price > 100)
/// FROM orders o
/// ```
pub fn decorrelate_plan() -> OptExpression {
    let mut columns = ColumnRefFactory::new();
    let o_id = columns.create("o_id", DataType::BigInt);
    let l_order_id = columns.create("l_order_id", DataType::BigInt);
    let l_qty = columns.create("l_qty", DataType::Int);
    let l_price = columns.create("l_price", DataType::Double);
    let doubled = columns.create("qty2", DataType::BigInt);
    let total = columns.create("total", DataType::BigInt);
    let output = columns.create("sq", DataType::BigInt);

    let predicate = ScalarOperator::and(
        ScalarOperator::column(l_order_id.clone()).equal(ScalarOperator::column(o_id.clone())),
        ScalarOperator::constant(100i32).lt(ScalarOperator::column(l_price.clone())),
    );

    let mut projection = BTreeMap::new();
    projection.insert(
        doubled.clone(),
        ScalarOperator::call(
            "multiply",
            DataType::BigInt,
            vec![ScalarOperator::column(l_qty.clone()), ScalarOperator::constant(2i32)],
        ),
    );

    let mut aggregations = BTreeMap::new();
    aggregations.insert(
        total.clone(),
        ScalarOperator::call("sum", DataType::BigInt, vec![ScalarOperator::column(doubled)]),
    );

    let subquery = PlanBuilder::scan("lineitem", vec![l_order_id, l_qty, l_price])
        .filter(predicate)
        .project(projection)
        .aggregate(vec![], aggregations)
        .build();

    let apply = ApplyOperator::new(ScalarOperator::column(total))
        .with_output(output)
        .with_correlation_column_refs(vec![o_id.clone()])
        .with_need_check_max_rows(true);

    PlanBuilder::scan("orders", vec![o_id]).apply(subquery, apply).build()
}
