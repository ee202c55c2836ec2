//! Unit tests for common-config crate

use common_config::{QuarryConfig, RewriteConfig, TraversalOrder};

#[test]
fn test_quarry_config_default() {
    let config = QuarryConfig::default();

    assert_eq!(config.rewrite.max_iterations, 100);
    assert!(!config.rewrite.enable_trace);
    assert_eq!(config.rewrite.traversal, TraversalOrder::BottomUp);
    assert!(config.rewrite.disabled_rules.is_empty());
}

#[test]
fn test_traversal_order_default() {
    assert_eq!(TraversalOrder::default(), TraversalOrder::BottomUp);
    assert_ne!(TraversalOrder::BottomUp, TraversalOrder::TopDown);
}

#[test]
fn test_rewrite_config_builders() {
    let config = RewriteConfig::default()
        .with_max_iterations(3)
        .with_trace(true)
        .with_traversal(TraversalOrder::TopDown)
        .with_disabled_rule("ImplicitCast");

    assert_eq!(config.max_iterations, 3);
    assert!(config.enable_trace);
    assert_eq!(config.traversal, TraversalOrder::TopDown);
    assert!(!config.is_rule_enabled("ImplicitCast"));
    assert!(config.is_rule_enabled("NormalizePredicate"));
}

#[test]
fn test_quarry_config_serialization() {
    let mut config = QuarryConfig::default();
    config.rewrite.max_iterations = 7;
    config.rewrite.enable_trace = true;
    config.rewrite.traversal = TraversalOrder::TopDown;
    config.rewrite.disabled_rules = vec!["PushDownApplyAggProjectFilter".to_string()];

    let json = config.to_json_string().unwrap();
    let deserialized = QuarryConfig::from_json_str(&json).unwrap();

    assert_eq!(deserialized, config);
}

#[test]
fn test_partial_json_uses_defaults() {
    let config = QuarryConfig::from_json_str(r#"{"rewrite": {"enable_trace": true}}"#).unwrap();

    assert!(config.rewrite.enable_trace);
    assert_eq!(config.rewrite.max_iterations, 100);
    assert_eq!(config.rewrite.traversal, TraversalOrder::BottomUp);
}

#[test]
fn test_traversal_order_json_names() {
    let config =
        QuarryConfig::from_json_str(r#"{"rewrite": {"traversal": "top_down"}}"#).unwrap();
    assert_eq!(config.rewrite.traversal, TraversalOrder::TopDown);
}

#[test]
fn test_unknown_field_rejected() {
    let result = QuarryConfig::from_json_str(r#"{"rewrite": {"max_passes": 3}}"#);
    assert!(result.is_err());
}

#[test]
fn test_invalid_json_rejected() {
    assert!(QuarryConfig::from_json_str("{ rewrite: }").is_err());
}
