//! The dispatcher that drives transformation rules over a plan.
//!
//! The optimizer walks the plan, tries every enabled rule at every node, and
//! repeats whole passes until one makes no change or the pass budget runs
//! out.

use std::collections::BTreeMap;

use common_config::{RewriteConfig, TraversalOrder};
use common_error::QuarryResult;
use log::debug;
use quarry_logical::OptExpression;

use crate::context::OptimizerContext;

use super::rule::{OptimizedPlan, RuleTrace, TransformationRule, Transformed};
use super::rule_set::RuleSet;

/// Applies a [`RuleSet`] to logical plans.
///
/// # Termination
///
/// Rules must be confluent and terminating on their own. Every default rule
/// either stops returning alternatives once nothing changes (the scalar
/// rules) or destroys its own pattern (the push-down). The pass budget only
/// bounds a misbehaving custom rule.
#[derive(Debug)]
pub struct Optimizer {
    /// The rules to apply (in order).
    rules: RuleSet,
    /// Configuration.
    config: RewriteConfig,
}

/// Counters accumulated across passes.
#[derive(Default)]
struct PassStats {
    iteration: usize,
    rules_applied: usize,
    applied_counts: BTreeMap<String, usize>,
    trace: Vec<RuleTrace>,
}

impl PassStats {
    fn finish(self, plan: OptExpression) -> OptimizedPlan {
        OptimizedPlan {
            plan,
            iterations: self.iteration,
            rules_applied: self.rules_applied,
            applied_counts: self.applied_counts,
            trace: self.trace,
        }
    }
}

impl Optimizer {
    /// Create a new optimizer with the given rules.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            config: RewriteConfig::default(),
        }
    }

    /// Create a new optimizer with custom config.
    pub fn with_config(rules: RuleSet, config: RewriteConfig) -> Self {
        Self { rules, config }
    }

    /// Add a rule to the optimizer.
    pub fn add_rule<R: TransformationRule + 'static>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Optimize a plan.
    ///
    /// Repeats passes until no rule changes the plan. Reaching
    /// `max_iterations` stops the loop and returns the plan as it stands.
    pub fn optimize(
        &self,
        plan: OptExpression,
        ctx: &OptimizerContext,
    ) -> QuarryResult<OptimizedPlan> {
        let mut current_plan = plan;
        let mut stats = PassStats::default();

        loop {
            if stats.iteration >= self.config.max_iterations {
                debug!(
                    "Optimizer reached max iterations ({}), stopping",
                    self.config.max_iterations
                );
                break;
            }

            stats.iteration += 1;
            let result = self.rewrite(current_plan, ctx, &mut stats)?;
            current_plan = result.plan;

            if !result.changed {
                debug!("No changes in iteration {}, reached fixpoint", stats.iteration);
                break;
            }
        }

        Ok(stats.finish(current_plan))
    }

    /// Optimize with a single pass (no fixpoint iteration).
    pub fn optimize_once(
        &self,
        plan: OptExpression,
        ctx: &OptimizerContext,
    ) -> QuarryResult<OptimizedPlan> {
        let mut stats = PassStats {
            iteration: 1,
            ..PassStats::default()
        };
        let result = self.rewrite(plan, ctx, &mut stats)?;
        Ok(stats.finish(result.plan))
    }

    /// One pass over the whole tree in the configured order.
    fn rewrite(
        &self,
        expr: OptExpression,
        ctx: &OptimizerContext,
        stats: &mut PassStats,
    ) -> QuarryResult<Transformed> {
        match self.config.traversal {
            TraversalOrder::BottomUp => {
                let (op, inputs) = expr.into_parts();
                let (inputs, inputs_changed) = self.rewrite_inputs(inputs, ctx, stats)?;
                let result = self.apply_rules(OptExpression::new(op, inputs), ctx, stats)?;
                Ok(Transformed {
                    plan: result.plan,
                    changed: inputs_changed || result.changed,
                })
            }
            TraversalOrder::TopDown => {
                let result = self.apply_rules(expr, ctx, stats)?;
                let (op, inputs) = result.plan.into_parts();
                let (inputs, inputs_changed) = self.rewrite_inputs(inputs, ctx, stats)?;
                Ok(Transformed {
                    plan: OptExpression::new(op, inputs),
                    changed: inputs_changed || result.changed,
                })
            }
        }
    }

    fn rewrite_inputs(
        &self,
        inputs: Vec<OptExpression>,
        ctx: &OptimizerContext,
        stats: &mut PassStats,
    ) -> QuarryResult<(Vec<OptExpression>, bool)> {
        let mut changed = false;
        let mut rewritten = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = self.rewrite(input, ctx, stats)?;
            changed |= result.changed;
            rewritten.push(result.plan);
        }
        Ok((rewritten, changed))
    }

    /// Try every enabled rule on one node, in order.
    ///
    /// A rule that fires replaces the node with its first alternative; later
    /// rules see the replacement.
    fn apply_rules(
        &self,
        expr: OptExpression,
        ctx: &OptimizerContext,
        stats: &mut PassStats,
    ) -> QuarryResult<Transformed> {
        let mut current = expr;
        let mut changed = false;

        for rule in self.rules.iter() {
            if !self.config.is_rule_enabled(rule.name()) {
                continue;
            }
            if !rule.pattern().matches(&current) || !rule.check(&current, ctx) {
                continue;
            }

            let Some(replacement) = rule.transform(&current, ctx)?.into_iter().next() else {
                continue;
            };

            debug!("Rule '{}' applied in iteration {}", rule.name(), stats.iteration);
            if self.config.enable_trace {
                stats.trace.push(RuleTrace::new(
                    rule.name(),
                    current.explain(),
                    replacement.explain(),
                    true,
                ));
            }
            stats.rules_applied += 1;
            *stats.applied_counts.entry(rule.name().to_string()).or_insert(0) += 1;

            current = replacement;
            changed = true;
        }

        Ok(Transformed {
            plan: current,
            changed,
        })
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(RuleSet::default_rules())
    }
}
