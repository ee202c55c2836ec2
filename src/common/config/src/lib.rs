//! Configuration management for Quarry.
//!
//! Provides the knobs that control how the rule dispatcher drives rewrites.
//! Configuration is plain data: it is loaded once per compilation and never
//! mutated while a rewrite pass runs.

use serde::{Deserialize, Serialize};

use common_error::QuarryResult;

/// Global Quarry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct QuarryConfig {
    /// Rewrite dispatcher configuration.
    pub rewrite: RewriteConfig,
}

impl QuarryConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> QuarryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> QuarryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Order in which the dispatcher visits plan nodes within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    /// Children are rewritten before their parent.
    #[default]
    BottomUp,
    /// A parent is rewritten before its children.
    TopDown,
}

/// Configuration for the rule dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// Maximum number of passes before stopping.
    pub max_iterations: usize,
    /// Whether to record before/after explain text for every applied rule.
    pub enable_trace: bool,
    /// Node visiting order within a pass.
    pub traversal: TraversalOrder,
    /// Names of rules the dispatcher must skip.
    pub disabled_rules: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            enable_trace: false,
            traversal: TraversalOrder::BottomUp,
            disabled_rules: Vec::new(),
        }
    }
}

impl RewriteConfig {
    /// Set the pass budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Enable or disable tracing.
    #[must_use]
    pub fn with_trace(mut self, enable: bool) -> Self {
        self.enable_trace = enable;
        self
    }

    /// Set the node visiting order.
    #[must_use]
    pub fn with_traversal(mut self, traversal: TraversalOrder) -> Self {
        self.traversal = traversal;
        self
    }

    /// Disable a rule by name.
    #[must_use]
    pub fn with_disabled_rule(mut self, name: impl Into<String>) -> Self {
        self.disabled_rules.push(name.into());
        self
    }

    /// Whether the named rule is enabled.
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == name)
    }
}
