//! Logical relational operators.

use std::collections::BTreeMap;

use common_error::QuarryResult;

use crate::column::ColumnRef;
use crate::scalar::{ScalarKind, ScalarOperator};

/// Logical operator kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorType {
    Scan,
    Filter,
    Project,
    Aggregation,
    Apply,
    Select,
}

impl OperatorType {
    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scan => "Scan",
            Self::Filter => "Filter",
            Self::Project => "Project",
            Self::Aggregation => "Aggregation",
            Self::Apply => "Apply",
            Self::Select => "Select",
        }
    }

    /// Number of inputs an operator of this kind takes.
    pub const fn arity(self) -> usize {
        match self {
            Self::Scan => 0,
            Self::Apply => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for OperatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Aggregation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AggType {
    #[default]
    Global,
    Local,
    Distinct,
}

impl std::fmt::Display for AggType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "GLOBAL"),
            Self::Local => write!(f, "LOCAL"),
            Self::Distinct => write!(f, "DISTINCT"),
        }
    }
}

/// A correlated subquery joined to its outer row source.
///
/// The left input is the outer query, the right input the subquery plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOperator {
    /// Column carrying the subquery result, for scalar subqueries.
    pub output: Option<ColumnRef>,
    /// Rewritten subquery expression (`EXISTS`, `IN`, or the scalar result).
    pub subquery: ScalarOperator,
    /// Outer columns referenced inside the subquery.
    pub correlation_column_refs: Vec<ColumnRef>,
    /// Conjuncts linking the subquery to the outer scope.
    pub correlation_conjuncts: Option<ScalarOperator>,
    /// Predicate applied to the joined row.
    pub predicate: Option<ScalarOperator>,
    /// Whether a scalar subquery must be checked to return at most one row.
    pub need_check_max_rows: bool,
    /// Whether the subquery came from an AND-connected WHERE/FROM scope.
    pub from_and_scope: bool,
}

impl ApplyOperator {
    /// Uncorrelated apply over `subquery`.
    pub fn new(subquery: ScalarOperator) -> Self {
        Self {
            output: None,
            subquery,
            correlation_column_refs: Vec::new(),
            correlation_conjuncts: None,
            predicate: None,
            need_check_max_rows: false,
            from_and_scope: false,
        }
    }

    pub fn with_output(mut self, output: ColumnRef) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_correlation_column_refs(mut self, refs: Vec<ColumnRef>) -> Self {
        self.correlation_column_refs = refs;
        self
    }

    pub fn with_correlation_conjuncts(mut self, conjuncts: ScalarOperator) -> Self {
        self.correlation_conjuncts = Some(conjuncts);
        self
    }

    pub fn with_predicate(mut self, predicate: ScalarOperator) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_need_check_max_rows(mut self, need_check_max_rows: bool) -> Self {
        self.need_check_max_rows = need_check_max_rows;
        self
    }

    pub fn with_from_and_scope(mut self, from_and_scope: bool) -> Self {
        self.from_and_scope = from_and_scope;
        self
    }

    /// `[NOT] EXISTS` subquery.
    pub fn is_existential(&self) -> bool {
        self.subquery.kind() == ScalarKind::Exists
    }

    /// `[NOT] IN` subquery.
    pub fn is_quantified(&self) -> bool {
        self.subquery.kind() == ScalarKind::InPredicate
    }

    /// Scalar-valued subquery.
    pub fn is_scalar(&self) -> bool {
        !self.is_existential() && !self.is_quantified()
    }

    /// Whether the subquery references the outer scope.
    pub fn is_correlated(&self) -> bool {
        !self.correlation_column_refs.is_empty()
    }
}

/// A logical relational operator.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalOperator {
    /// Leaf row source.
    Scan {
        table: String,
        columns: Vec<ColumnRef>,
    },
    /// Row filter.
    Filter { predicate: ScalarOperator },
    /// Computes each output column from its expression.
    Project {
        column_ref_map: BTreeMap<ColumnRef, ScalarOperator>,
    },
    /// Grouped or scalar aggregation.
    Aggregation {
        agg_type: AggType,
        grouping_keys: Vec<ColumnRef>,
        aggregations: BTreeMap<ColumnRef, ScalarOperator>,
    },
    /// Correlated subquery.
    Apply(ApplyOperator),
    /// Filter over a conjunct list.
    Select { conjuncts: Vec<ScalarOperator> },
}

impl LogicalOperator {
    pub fn scan(table: impl Into<String>, columns: Vec<ColumnRef>) -> Self {
        Self::Scan {
            table: table.into(),
            columns,
        }
    }

    pub fn filter(predicate: ScalarOperator) -> Self {
        Self::Filter { predicate }
    }

    pub fn project(column_ref_map: BTreeMap<ColumnRef, ScalarOperator>) -> Self {
        Self::Project { column_ref_map }
    }

    /// Global aggregation.
    pub fn aggregation(
        grouping_keys: Vec<ColumnRef>,
        aggregations: BTreeMap<ColumnRef, ScalarOperator>,
    ) -> Self {
        Self::Aggregation {
            agg_type: AggType::Global,
            grouping_keys,
            aggregations,
        }
    }

    pub fn select(conjuncts: Vec<ScalarOperator>) -> Self {
        Self::Select { conjuncts }
    }

    /// Kind tag.
    pub fn operator_type(&self) -> OperatorType {
        match self {
            Self::Scan { .. } => OperatorType::Scan,
            Self::Filter { .. } => OperatorType::Filter,
            Self::Project { .. } => OperatorType::Project,
            Self::Aggregation { .. } => OperatorType::Aggregation,
            Self::Apply(_) => OperatorType::Apply,
            Self::Select { .. } => OperatorType::Select,
        }
    }

    /// Apply payload, if this is an Apply.
    pub fn as_apply(&self) -> Option<&ApplyOperator> {
        match self {
            Self::Apply(apply) => Some(apply),
            _ => None,
        }
    }

    /// Scalar expressions owned by this operator, in a fixed order.
    ///
    /// Map-valued operators list their expressions in key order; Apply lists
    /// subquery, correlation conjuncts, then predicate.
    pub fn expressions(&self) -> Vec<&ScalarOperator> {
        match self {
            Self::Scan { .. } => Vec::new(),
            Self::Filter { predicate } => vec![predicate],
            Self::Project { column_ref_map } => column_ref_map.values().collect(),
            Self::Aggregation { aggregations, .. } => aggregations.values().collect(),
            Self::Apply(apply) => std::iter::once(&apply.subquery)
                .chain(apply.correlation_conjuncts.as_ref())
                .chain(apply.predicate.as_ref())
                .collect(),
            Self::Select { conjuncts } => conjuncts.iter().collect(),
        }
    }

    /// Rewrite every owned expression with `f`, keeping kind and keys.
    pub fn map_expressions<F>(self, mut f: F) -> QuarryResult<Self>
    where
        F: FnMut(ScalarOperator) -> QuarryResult<ScalarOperator>,
    {
        Ok(match self {
            Self::Scan { .. } => self,
            Self::Filter { predicate } => Self::Filter {
                predicate: f(predicate)?,
            },
            Self::Project { column_ref_map } => Self::Project {
                column_ref_map: map_values(column_ref_map, f)?,
            },
            Self::Aggregation {
                agg_type,
                grouping_keys,
                aggregations,
            } => Self::Aggregation {
                agg_type,
                grouping_keys,
                aggregations: map_values(aggregations, f)?,
            },
            Self::Apply(mut apply) => {
                apply.subquery = f(apply.subquery)?;
                apply.correlation_conjuncts = apply.correlation_conjuncts.map(&mut f).transpose()?;
                apply.predicate = apply.predicate.map(&mut f).transpose()?;
                Self::Apply(apply)
            }
            Self::Select { conjuncts } => Self::Select {
                conjuncts: conjuncts.into_iter().map(f).collect::<QuarryResult<_>>()?,
            },
        })
    }

    /// Columns this operator produces given its inputs' outputs.
    pub fn output_columns(&self, inputs: &[Vec<ColumnRef>]) -> Vec<ColumnRef> {
        let input = |i: usize| inputs.get(i).cloned().unwrap_or_default();
        match self {
            Self::Scan { columns, .. } => columns.clone(),
            Self::Filter { .. } | Self::Select { .. } => input(0),
            Self::Project { column_ref_map } => column_ref_map.keys().cloned().collect(),
            Self::Aggregation {
                grouping_keys,
                aggregations,
                ..
            } => grouping_keys
                .iter()
                .chain(aggregations.keys())
                .cloned()
                .collect(),
            Self::Apply(apply) => {
                let mut columns = input(0);
                columns.extend(apply.output.clone());
                columns
            }
        }
    }

    /// One-line summary used by plan explain.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Scan { table, columns } => Some(format!("{table}: {}", join(columns))),
            Self::Filter { predicate } => Some(predicate.to_string()),
            Self::Project { column_ref_map } => Some(assignments(column_ref_map)),
            Self::Aggregation {
                agg_type,
                grouping_keys,
                aggregations,
            } => Some(format!(
                "{agg_type} group by [{}] aggs [{}]",
                join(grouping_keys),
                assignments(aggregations)
            )),
            Self::Apply(apply) => {
                let mut parts = vec![format!("subquery: {}", apply.subquery)];
                if !apply.correlation_column_refs.is_empty() {
                    parts.push(format!("correlation: [{}]", join(&apply.correlation_column_refs)));
                }
                if let Some(conjuncts) = &apply.correlation_conjuncts {
                    parts.push(format!("conjuncts: {conjuncts}"));
                }
                if let Some(predicate) = &apply.predicate {
                    parts.push(format!("predicate: {predicate}"));
                }
                Some(parts.join(", "))
            }
            Self::Select { conjuncts } => Some(
                conjuncts
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" AND "),
            ),
        }
    }
}

fn map_values<F>(
    map: BTreeMap<ColumnRef, ScalarOperator>,
    mut f: F,
) -> QuarryResult<BTreeMap<ColumnRef, ScalarOperator>>
where
    F: FnMut(ScalarOperator) -> QuarryResult<ScalarOperator>,
{
    map.into_iter().map(|(k, v)| Ok((k, f(v)?))).collect()
}

fn join(columns: &[ColumnRef]) -> String {
    columns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn assignments(map: &BTreeMap<ColumnRef, ScalarOperator>) -> String {
    map.iter()
        .map(|(k, v)| format!("{k} := {v}"))
        .collect::<Vec<_>>()
        .join(", ")
}
