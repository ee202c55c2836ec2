//! Integration tests for quarry-optimizer
//!
//! End-to-end rewrites through the default rule set, plus property tests for
//! the implicit-cast and decorrelation rules.

use std::collections::BTreeMap;
use std::sync::Arc;

use common_config::QuarryConfig;
use proptest::prelude::*;
use quarry_core::{BuiltinCatalog, Catalog, DataType};
use quarry_logical::{
    ApplyOperator, BinaryType, ColumnRef, LogicalOperator, OperatorType, OptExpression,
    PlanBuilder, ScalarOp, ScalarOperator, validate_plan,
};
use quarry_optimizer::rewrite::{
    ImplicitCastRule, RewriteOrder, ScalarOperatorRewriter, ScalarRewriteContext, try_cast_constant,
};
use quarry_optimizer::{
    OptimizerContext, Optimizer, PushDownApplyAggProjectFilterRule, RuleSet, RuleType,
    TransformationRule, optimize,
};

fn catalog() -> Arc<dyn Catalog> {
    Arc::new(BuiltinCatalog::with_builtins())
}

fn implicit_cast(op: ScalarOperator) -> ScalarOperator {
    let catalog = BuiltinCatalog::with_builtins();
    let ctx = ScalarRewriteContext::new(&catalog);
    ScalarOperatorRewriter::new()
        .with_rule(ImplicitCastRule, RewriteOrder::TopDown)
        .rewrite(op, &ctx)
        .unwrap()
}

fn filter_predicate(plan: &OptExpression) -> &ScalarOperator {
    match plan.op() {
        LogicalOperator::Filter { predicate } => predicate,
        other => panic!("expected a filter, found {other:?}"),
    }
}

fn strip_implicit_cast(op: &ScalarOperator) -> &ScalarOperator {
    if op.is_implicit_cast() { op.child(0).unwrap() } else { op }
}

// ---------------------------------------------------------------------------
// End-to-end examples
// ---------------------------------------------------------------------------

#[test]
fn test_string_column_equals_int_literal() {
    let s = ColumnRef::new(1, "stringColumn", DataType::Varchar);
    let plan = PlanBuilder::scan("t", vec![s.clone()])
        .filter(ScalarOperator::column(s).equal(ScalarOperator::constant(5i32)))
        .build();

    let optimized = optimize(plan, catalog()).unwrap();
    let predicate = filter_predicate(&optimized);
    assert_eq!(
        predicate.to_string(),
        "cast(stringColumn AS DOUBLE) = cast(5 AS DOUBLE)"
    );
    assert!(predicate.children().iter().all(ScalarOperator::is_implicit_cast));
    validate_plan(&optimized).unwrap();
}

#[test]
fn test_case_when_branches_cast_to_result_type() {
    let a = ColumnRef::new(1, "a", DataType::Int);
    let r = ColumnRef::new(2, "r", DataType::Double);
    let col_a = || ScalarOperator::column(a.clone());
    let case = ScalarOperator::case_when(
        DataType::Double,
        None,
        vec![
            col_a().gt(ScalarOperator::constant(0i32)),
            ScalarOperator::constant(1i32),
            col_a().lt(ScalarOperator::constant(0i32)),
            ScalarOperator::constant(2.5f64),
        ],
        Some(ScalarOperator::constant(0i32)),
    )
    .unwrap();

    let mut projection = BTreeMap::new();
    projection.insert(r.clone(), case);
    let plan = PlanBuilder::scan("t", vec![a]).project(projection).build();

    let optimized = optimize(plan, catalog()).unwrap();
    let LogicalOperator::Project { column_ref_map } = optimized.op() else {
        panic!("expected a project");
    };
    let case = &column_ref_map[&r];
    assert_eq!(
        case.to_string(),
        "CASE WHEN a > 0 THEN cast(1 AS DOUBLE) WHEN a < 0 THEN 2.5 ELSE cast(0 AS DOUBLE) END"
    );
    assert_eq!(case.when_clause(1).unwrap().to_string(), "a < 0");
    assert_eq!(case.then_clause(1).unwrap().to_string(), "2.5");
    assert!(case.else_clause().unwrap().is_implicit_cast());
}

#[test]
fn test_normalize_then_cast() {
    let a = ColumnRef::new(1, "a", DataType::BigInt);
    let plan = PlanBuilder::scan("t", vec![a.clone()])
        .filter(ScalarOperator::not(
            ScalarOperator::constant(5i32).lt(ScalarOperator::column(a)),
        ))
        .build();

    let optimizer = Optimizer::default();
    let result = optimizer.optimize(plan, &OptimizerContext::new(catalog())).unwrap();

    // 5 < a -> a > 5 -> a <= 5, then 5 is re-typed as BIGINT.
    let predicate = filter_predicate(&result.plan);
    assert_eq!(predicate.to_string(), "a <= 5");
    assert_eq!(predicate.child(1).unwrap().data_type(), &DataType::BigInt);
    assert_eq!(result.applied(RuleType::NormalizePredicate), 1);
    assert_eq!(result.applied(RuleType::ImplicitCast), 1);
    assert_eq!(result.iterations, 2);
}

#[test]
fn test_disabled_rule_from_json_config() {
    let config =
        QuarryConfig::from_json_str(r#"{"rewrite": {"disabled_rules": ["ImplicitCast"]}}"#)
            .unwrap();
    let s = ColumnRef::new(1, "s", DataType::Varchar);
    let plan = PlanBuilder::scan("t", vec![s.clone()])
        .filter(ScalarOperator::column(s).equal(ScalarOperator::constant(5i32)))
        .build();

    let optimizer = Optimizer::with_config(RuleSet::default_rules(), config.rewrite);
    let result = optimizer.optimize(plan.clone(), &OptimizerContext::new(catalog())).unwrap();
    assert_eq!(result.plan, plan);
    assert_eq!(result.rules_applied, 0);
}

#[test]
fn test_concurrent_compilations_agree() {
    let shared = catalog();
    let plan = {
        let s = ColumnRef::new(1, "s", DataType::Varchar);
        PlanBuilder::scan("t", vec![s.clone()])
            .filter(ScalarOperator::column(s).equal(ScalarOperator::constant(5i32)))
            .build()
    };

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = OptimizerContext::new(Arc::clone(&shared)).with_config(Default::default());
            let plan = plan.clone();
            std::thread::spawn(move || Optimizer::default().optimize(plan, &ctx).unwrap().plan)
        })
        .collect();

    let results: Vec<OptExpression> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_type_error_aborts_compilation() {
    let d = ColumnRef::new(1, "d", DataType::Date);
    let b = ColumnRef::new(2, "b", DataType::Boolean);
    let plan = PlanBuilder::scan("t", vec![d.clone(), b.clone()])
        .filter(ScalarOperator::column(d).equal(ScalarOperator::column(b)))
        .build();

    let err = optimize(plan, catalog()).unwrap_err();
    assert!(matches!(err, common_error::QuarryError::TypeError(_)));
}

// ---------------------------------------------------------------------------
// Decorrelation
// ---------------------------------------------------------------------------

struct Correlated {
    outer_key: ColumnRef,
    inner_cols: Vec<ColumnRef>,
    projected: ColumnRef,
    total: ColumnRef,
}

impl Correlated {
    fn new() -> Self {
        Self {
            outer_key: ColumnRef::new(1, "o_id", DataType::Int),
            inner_cols: vec![
                ColumnRef::new(2, "i_oid", DataType::Int),
                ColumnRef::new(3, "i_a", DataType::BigInt),
                ColumnRef::new(4, "i_b", DataType::BigInt),
            ],
            projected: ColumnRef::new(10, "p", DataType::BigInt),
            total: ColumnRef::new(11, "total", DataType::BigInt),
        }
    }

    /// Filter uses `uses` (indexes into the inner columns) plus the
    /// correlation; the Project pre-maps `premapped` to constants.
    fn plan(
        &self,
        uses: &[usize],
        premapped: &[usize],
        grouping: bool,
        apply: ApplyOperator,
    ) -> OptExpression {
        let mut predicate = ScalarOperator::column(self.inner_cols[0].clone())
            .equal(ScalarOperator::column(self.outer_key.clone()));
        for &i in uses {
            predicate = ScalarOperator::and(
                predicate,
                ScalarOperator::is_null(ScalarOperator::column(self.inner_cols[i].clone()), true),
            );
        }

        let mut projection = BTreeMap::new();
        projection.insert(
            self.projected.clone(),
            ScalarOperator::column(self.inner_cols[1].clone()),
        );
        for &i in premapped {
            projection.insert(self.inner_cols[i].clone(), ScalarOperator::constant(i as i64));
        }

        let mut aggregations = BTreeMap::new();
        aggregations.insert(
            self.total.clone(),
            ScalarOperator::call(
                "sum",
                DataType::BigInt,
                vec![ScalarOperator::column(self.projected.clone())],
            ),
        );
        let grouping_keys = if grouping { vec![self.projected.clone()] } else { vec![] };

        let subquery = PlanBuilder::scan("inner", self.inner_cols.clone())
            .filter(predicate)
            .project(projection)
            .aggregate(grouping_keys, aggregations)
            .build();
        PlanBuilder::scan("outer", vec![self.outer_key.clone()])
            .apply(subquery, apply)
            .build()
    }

    fn scalar_apply(&self) -> ApplyOperator {
        ApplyOperator::new(ScalarOperator::column(self.total.clone()))
            .with_output(ColumnRef::new(20, "sq", DataType::BigInt))
            .with_correlation_column_refs(vec![self.outer_key.clone()])
            .with_need_check_max_rows(true)
    }

    fn exists_apply(&self, negated: bool) -> ApplyOperator {
        ApplyOperator::new(ScalarOperator::exists(negated))
            .with_correlation_column_refs(vec![self.outer_key.clone()])
            .with_from_and_scope(true)
    }
}

#[test]
fn test_decorrelation_end_to_end() {
    let fx = Correlated::new();
    let plan = fx.plan(&[2], &[], false, fx.scalar_apply());
    validate_plan(&plan).unwrap();

    let result = Optimizer::default()
        .optimize(plan.clone(), &OptimizerContext::new(catalog()))
        .unwrap();
    assert_eq!(result.applied(RuleType::PushDownApplyAggProjectFilter), 1);

    let new_plan = &result.plan;
    validate_plan(new_plan).unwrap();
    assert_eq!(new_plan.op(), plan.op());
    assert_eq!(new_plan.output_columns(), plan.output_columns());

    let aggregate = new_plan.input(1).unwrap();
    let filter = aggregate.input(0).unwrap();
    let project = filter.input(0).unwrap();
    assert_eq!(aggregate.kind(), OperatorType::Aggregation);
    assert_eq!(filter.kind(), OperatorType::Filter);
    assert_eq!(project.kind(), OperatorType::Project);
    assert_eq!(project.input(0).unwrap().kind(), OperatorType::Scan);
}

#[test]
fn test_grouped_scalar_apply_is_left_alone() {
    let fx = Correlated::new();
    let plan = fx.plan(&[], &[], true, fx.scalar_apply());
    let result = Optimizer::default()
        .optimize(plan.clone(), &OptimizerContext::new(catalog()))
        .unwrap();
    assert_eq!(result.plan, plan);
}

fn arb_columns() -> impl Strategy<Value = Vec<usize>> {
    prop::sample::subsequence(vec![0usize, 1, 2], 0..=3)
}

proptest! {
    #[test]
    fn prop_grouped_non_existential_apply_never_fires(
        uses in arb_columns(),
        premapped in arb_columns(),
    ) {
        let fx = Correlated::new();
        let rule = PushDownApplyAggProjectFilterRule::new();
        let ctx = OptimizerContext::default();

        let plan = fx.plan(&uses, &premapped, true, fx.scalar_apply());
        prop_assert!(rule.pattern().matches(&plan));
        prop_assert!(!rule.check(&plan, &ctx));

        for negated in [false, true] {
            let existential = fx.plan(&uses, &premapped, true, fx.exists_apply(negated));
            prop_assert!(rule.check(&existential, &ctx));
        }
    }

    #[test]
    fn prop_push_down_preserves_columns(
        uses in arb_columns(),
        premapped in arb_columns(),
        existential in any::<bool>(),
    ) {
        let fx = Correlated::new();
        let apply = if existential { fx.exists_apply(false) } else { fx.scalar_apply() };
        let plan = fx.plan(&uses, &premapped, false, apply);

        let rule = PushDownApplyAggProjectFilterRule::new();
        let ctx = OptimizerContext::default();
        prop_assert!(rule.check(&plan, &ctx));

        let out = rule.transform(&plan, &ctx).unwrap();
        prop_assert_eq!(out.len(), 1);

        let old_project = plan.input(1).unwrap().input(0).unwrap();
        let new_filter = out[0].input(1).unwrap().input(0).unwrap();
        let new_project = new_filter.input(0).unwrap();
        let (
            LogicalOperator::Project { column_ref_map: old_map },
            LogicalOperator::Project { column_ref_map: new_map },
        ) = (old_project.op(), new_project.op())
        else {
            panic!("expected projects");
        };

        let predicate = filter_predicate(new_filter);
        for column in predicate.column_refs() {
            if column == fx.outer_key {
                prop_assert!(!new_map.contains_key(&column));
            } else {
                prop_assert!(new_map.contains_key(&column));
            }
        }
        for (column, expr) in old_map {
            prop_assert_eq!(new_map.get(column), Some(expr));
        }
        prop_assert!(validate_plan(&out[0]).is_ok());
    }
}

// ---------------------------------------------------------------------------
// Implicit cast properties
// ---------------------------------------------------------------------------

fn arb_type() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::TinyInt),
        Just(DataType::SmallInt),
        Just(DataType::Int),
        Just(DataType::BigInt),
        Just(DataType::LargeInt),
        Just(DataType::Float),
        Just(DataType::Double),
        Just(DataType::Varchar),
    ]
}

fn arb_numeric_literal() -> impl Strategy<Value = ScalarOperator> {
    prop_oneof![
        any::<i8>().prop_map(|v| ScalarOperator::constant(v)),
        any::<i16>().prop_map(|v| ScalarOperator::constant(v)),
        any::<i32>().prop_map(|v| ScalarOperator::constant(v)),
        any::<i64>().prop_map(|v| ScalarOperator::constant(v)),
        (-1000.0f32..1000.0).prop_map(|v| ScalarOperator::constant(v)),
        (-1000.0f64..1000.0).prop_map(|v| ScalarOperator::constant(v)),
    ]
}

fn arb_literal() -> impl Strategy<Value = ScalarOperator> {
    prop_oneof![
        4 => arb_numeric_literal(),
        2 => prop::sample::select(vec!["5", "07", "-12", "1.5", "abc", " 3", "1e3", "TRUE"])
            .prop_map(|s| ScalarOperator::constant(s)),
        1 => Just(ScalarOperator::null_of(DataType::Null)),
    ]
}

fn arb_column() -> impl Strategy<Value = ScalarOperator> {
    (1u32..6, arb_type())
        .prop_map(|(id, ty)| ScalarOperator::column(ColumnRef::new(id, format!("c{id}"), ty)))
}

fn arb_operand() -> impl Strategy<Value = ScalarOperator> {
    prop_oneof![arb_column(), arb_literal()]
}

fn arb_binary_type() -> impl Strategy<Value = BinaryType> {
    prop::sample::select(vec![
        BinaryType::Eq,
        BinaryType::Ne,
        BinaryType::Lt,
        BinaryType::Le,
        BinaryType::Gt,
        BinaryType::Ge,
        BinaryType::EqForNull,
    ])
}

fn arb_comparison() -> impl Strategy<Value = ScalarOperator> {
    prop_oneof![
        (arb_binary_type(), arb_operand(), arb_operand())
            .prop_map(|(op, l, r)| ScalarOperator::binary(op, l, r)),
        (arb_column(), prop::collection::vec(arb_operand(), 1..4), any::<bool>())
            .prop_map(|(v, list, negated)| ScalarOperator::in_list(v, list, negated)),
        (arb_column(), arb_operand(), arb_operand(), any::<bool>())
            .prop_map(|(v, lo, hi, negated)| ScalarOperator::between(v, lo, hi, negated)),
    ]
}

fn arb_predicate() -> impl Strategy<Value = ScalarOperator> {
    arb_comparison().prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| ScalarOperator::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| ScalarOperator::or(l, r)),
            inner.prop_map(ScalarOperator::not),
        ]
    })
}

/// Every child carries the type its parent requires.
fn well_typed(op: &ScalarOperator) -> bool {
    let children = op.children();
    let local = match op.op() {
        ScalarOp::BinaryPredicate(_) => {
            children[0].data_type().matches_type(children[1].data_type())
        }
        ScalarOp::InPredicate { .. } | ScalarOp::BetweenPredicate { .. } => children
            .iter()
            .all(|c| children[0].data_type().matches_type(c.data_type())),
        ScalarOp::CompoundPredicate(_) => {
            children.iter().all(|c| c.data_type() == &DataType::Boolean)
        }
        ScalarOp::LikePredicate(_) => children.iter().all(|c| c.data_type().is_string()),
        _ => true,
    };
    local && children.iter().all(well_typed)
}

proptest! {
    #[test]
    fn prop_implicit_cast_is_idempotent(pred in arb_predicate()) {
        let once = implicit_cast(pred);
        let twice = implicit_cast(once.clone());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_implicit_cast_output_is_well_typed(pred in arb_predicate()) {
        let out = implicit_cast(pred);
        prop_assert!(well_typed(&out), "not well typed: {}", out);
    }

    #[test]
    fn prop_float_literals_never_fold(v in -1.0e6f32..1.0e6, i in any::<i32>(), ty in arb_type()) {
        let catalog = BuiltinCatalog::new();
        if ty != DataType::Float {
            prop_assert!(try_cast_constant(&ScalarOperator::constant(v), &ty, &catalog).is_none());
        }
        let int_literal = ScalarOperator::constant(i);
        prop_assert!(try_cast_constant(&int_literal, &DataType::Float, &catalog).is_none());

        let f = ScalarOperator::column(ColumnRef::new(1, "f", DataType::Float));
        let out = implicit_cast(f.equal(ScalarOperator::constant(i)));
        prop_assert!(out.child(0).unwrap().is_implicit_cast());
        prop_assert!(out.child(1).unwrap().is_implicit_cast());
    }

    #[test]
    fn prop_fold_preserves_text(lit in arb_literal(), ty in arb_type()) {
        let catalog = BuiltinCatalog::new();
        let value = lit.as_constant().unwrap();
        let source = lit.data_type();

        let folded = try_cast_constant(&lit, &ty, &catalog);
        if let Some(folded) = &folded {
            prop_assert_eq!(folded.data_type(), &ty);
            if !value.is_null() {
                let text = folded.as_constant().unwrap().to_string();
                prop_assert_eq!(text.to_lowercase(), value.to_string().to_lowercase());
            }
        }

        let eligible =
            !source.matches_type(&ty) && *source != DataType::Float && ty != DataType::Float;
        if eligible && !value.is_null() {
            let lossless = catalog
                .cast_literal(value, &ty)
                .is_ok_and(|v| v.to_string().to_lowercase() == value.to_string().to_lowercase());
            prop_assert_eq!(folded.is_some(), lossless);
        }
    }

    #[test]
    fn prop_case_branches_keep_their_slots(
        has_case in any::<bool>(),
        pairs in prop::collection::vec((arb_numeric_literal(), arb_numeric_literal()), 1..5),
        else_clause in prop::option::of(arb_numeric_literal()),
    ) {
        let case_clause =
            has_case.then(|| ScalarOperator::column(ColumnRef::new(1, "k", DataType::Int)));
        let whens: Vec<ScalarOperator> = pairs
            .iter()
            .enumerate()
            .map(|(i, (when, _))| {
                if has_case {
                    when.clone()
                } else {
                    let id = i as u32 + 10;
                    ScalarOperator::column(ColumnRef::new(id, format!("b{i}"), DataType::Boolean))
                }
            })
            .collect();
        let thens: Vec<ScalarOperator> = pairs.iter().map(|(_, then)| then.clone()).collect();
        let when_then = whens
            .iter()
            .cloned()
            .zip(thens.iter().cloned())
            .flat_map(|(w, t)| [w, t])
            .collect();

        let case = ScalarOperator::case_when(
            DataType::Double,
            case_clause.clone(),
            when_then,
            else_clause.clone(),
        )
        .unwrap();
        let out = implicit_cast(case);

        prop_assert_eq!(out.when_clause_size().unwrap(), pairs.len());
        for i in 0..pairs.len() {
            prop_assert_eq!(strip_implicit_cast(out.when_clause(i).unwrap()), &whens[i]);
            let then = out.then_clause(i).unwrap();
            prop_assert_eq!(strip_implicit_cast(then), &thens[i]);
            prop_assert!(then.data_type().matches_type(&DataType::Double));
        }
        prop_assert_eq!(out.case_clause().map(strip_implicit_cast), case_clause.as_ref());
        prop_assert_eq!(out.else_clause().map(strip_implicit_cast), else_clause.as_ref());
        if !has_case {
            for i in 0..pairs.len() {
                prop_assert!(!out.when_clause(i).unwrap().is_implicit_cast());
            }
        }
    }
}

#[test]
fn test_rule_registry_is_exhaustive() {
    let rules = RuleSet::default_rules();
    let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
    assert_eq!(names, ["NormalizePredicate", "ImplicitCast", "PushDownApplyAggProjectFilter"]);
    assert_eq!(rules.rule_types(), RuleType::ALL);
}
