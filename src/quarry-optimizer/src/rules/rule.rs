//! Transformation rule trait and framework.
//!
//! A rule pairs a [`Pattern`] with a semantic guard and a rewrite. The
//! dispatcher only calls [`TransformationRule::transform`] on a node that
//! matches the pattern and passes [`TransformationRule::check`].

use std::collections::BTreeMap;
use std::fmt;

use common_error::QuarryResult;
use quarry_logical::OptExpression;

use crate::context::OptimizerContext;
use crate::pattern::Pattern;

use super::{PushDownApplyAggProjectFilterRule, ScalarRewritePlanRule};

/// Identifies every rule the optimizer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleType {
    /// Canonical comparison form.
    NormalizePredicate,
    /// CAST insertion and literal re-typing.
    ImplicitCast,
    /// `Apply(_, Agg(Project(Filter)))` to `Apply(_, Agg(Filter(Project)))`.
    PushDownApplyAggProjectFilter,
}

impl RuleType {
    /// Every rule type, in default application order.
    pub const ALL: [RuleType; 3] = [
        RuleType::NormalizePredicate,
        RuleType::ImplicitCast,
        RuleType::PushDownApplyAggProjectFilter,
    ];

    /// Stable name, used in logs, traces and `disabled_rules`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NormalizePredicate => "NormalizePredicate",
            Self::ImplicitCast => "ImplicitCast",
            Self::PushDownApplyAggProjectFilter => "PushDownApplyAggProjectFilter",
        }
    }

    /// Build the rule this tag names.
    pub fn instantiate(self) -> Box<dyn TransformationRule> {
        match self {
            Self::NormalizePredicate => Box::new(ScalarRewritePlanRule::normalize_predicate()),
            Self::ImplicitCast => Box::new(ScalarRewritePlanRule::implicit_cast()),
            Self::PushDownApplyAggProjectFilter => {
                Box::new(PushDownApplyAggProjectFilterRule::new())
            }
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A plan rewrite driven by the [`Optimizer`](super::Optimizer).
///
/// Implementations must be deterministic and must not rely on state outside
/// the node they are given and the context.
pub trait TransformationRule: Send + Sync {
    /// Tag identifying this rule.
    fn rule_type(&self) -> RuleType;

    /// Get the name of this rule.
    fn name(&self) -> &'static str {
        self.rule_type().name()
    }

    /// Shape the node must have before [`check`](Self::check) is called.
    fn pattern(&self) -> &Pattern;

    /// Semantic guard, run after the pattern matched.
    fn check(&self, _expr: &OptExpression, _ctx: &OptimizerContext) -> bool {
        true
    }

    /// Produce replacement subtrees for `expr`. Empty means no rewrite.
    fn transform(
        &self,
        expr: &OptExpression,
        ctx: &OptimizerContext,
    ) -> QuarryResult<Vec<OptExpression>>;
}

/// The result of one rewrite pass.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// The (potentially transformed) plan.
    pub plan: OptExpression,
    /// Whether the plan was actually changed.
    pub changed: bool,
}

/// A trace entry for a single rule application.
#[derive(Debug, Clone)]
pub struct RuleTrace {
    /// The name of the rule that was applied.
    pub rule_name: String,
    /// The rewritten subtree before the rule ran (as explain string).
    pub before: String,
    /// The replacement subtree (as explain string).
    pub after: String,
    /// Whether the rule actually changed the plan.
    pub changed: bool,
}

impl RuleTrace {
    /// Create a new trace entry.
    pub fn new(
        rule_name: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
        changed: bool,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            before: before.into(),
            after: after.into(),
            changed,
        }
    }
}

/// The result of optimization with optional trace information.
#[derive(Debug, Clone)]
pub struct OptimizedPlan {
    /// The final plan.
    pub plan: OptExpression,
    /// Number of passes performed.
    pub iterations: usize,
    /// Number of rule applications that changed the plan.
    pub rules_applied: usize,
    /// Applications per rule name.
    pub applied_counts: BTreeMap<String, usize>,
    /// Detailed trace of rule applications (if tracing was enabled).
    pub trace: Vec<RuleTrace>,
}

impl OptimizedPlan {
    /// Create a result for a plan no rule has touched.
    pub fn new(plan: OptExpression) -> Self {
        Self {
            plan,
            iterations: 0,
            rules_applied: 0,
            applied_counts: BTreeMap::new(),
            trace: Vec::new(),
        }
    }

    /// How many times `rule` changed the plan.
    pub fn applied(&self, rule: RuleType) -> usize {
        self.applied_counts.get(rule.name()).copied().unwrap_or(0)
    }

    /// Format the trace as a human-readable string.
    pub fn format_trace(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Optimization completed in {} iterations, {} rules applied\n",
            self.iterations, self.rules_applied
        ));
        for (name, count) in &self.applied_counts {
            output.push_str(&format!("  {name}: {count}\n"));
        }

        if self.trace.is_empty() {
            output.push_str("  (no trace available)\n");
        } else {
            for (i, entry) in self.trace.iter().filter(|t| t.changed).enumerate() {
                output.push_str(&format!(
                    "\n--- Rule {} applied: {} ---\n",
                    i + 1,
                    entry.rule_name
                ));
                output.push_str("Before:\n");
                output.push_str(&entry.before);
                output.push_str("\nAfter:\n");
                output.push_str(&entry.after);
            }
        }

        output
    }
}
