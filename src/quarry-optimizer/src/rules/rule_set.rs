//! Ordered rule registry.

use std::fmt;

use super::rule::{RuleType, TransformationRule};

/// Rules in the fixed order the dispatcher tries them.
///
/// Order is part of the optimizer's contract: the same plan and the same
/// rule set always produce the same rewrite.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn TransformationRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// NormalizePredicate, ImplicitCast, then PushDownApplyAggProjectFilter.
    pub fn default_rules() -> Self {
        Self::from_types(&RuleType::ALL)
    }

    /// Instantiate the given rule types in order.
    pub fn from_types(types: &[RuleType]) -> Self {
        Self {
            rules: types.iter().map(|t| t.instantiate()).collect(),
        }
    }

    /// Append a rule.
    pub fn push(&mut self, rule: Box<dyn TransformationRule>) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn TransformationRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Tags of the registered rules, in order.
    pub fn rule_types(&self) -> Vec<RuleType> {
        self.iter().map(|r| r.rule_type()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<Box<dyn TransformationRule>>> for RuleSet {
    fn from(rules: Vec<Box<dyn TransformationRule>>) -> Self {
        Self { rules }
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|r| r.name())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let rules = RuleSet::default_rules();
        assert_eq!(
            rules.rule_types(),
            vec![
                RuleType::NormalizePredicate,
                RuleType::ImplicitCast,
                RuleType::PushDownApplyAggProjectFilter
            ]
        );
        assert_eq!(
            format!("{rules:?}"),
            "[\"NormalizePredicate\", \"ImplicitCast\", \"PushDownApplyAggProjectFilter\"]"
        );
    }

    #[test]
    fn test_from_types_keeps_order() {
        let mut rules = RuleSet::from_types(&[RuleType::ImplicitCast]);
        rules.push(RuleType::NormalizePredicate.instantiate());
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules.rule_types(),
            vec![RuleType::ImplicitCast, RuleType::NormalizePredicate]
        );
        assert!(RuleSet::new().is_empty());
    }
}
