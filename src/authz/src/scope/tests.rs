/// Test suite for scope parsing and predicates
///
/// Tests cover:
/// - Literal parsing
/// - `all`, `me`, `related` predicates
/// - Dotted path descent
/// - Fail-closed behaviour on malformed grants

use super::*;
use serde_json::json;
use std::str::FromStr;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Parsing Tests
// ============================================================================

#[test]
fn test_scope_parsing() {
    assert_eq!(Scope::from_str("all").unwrap(), Scope::All);
    assert_eq!(Scope::from_str("related").unwrap(), Scope::Related);
    assert_eq!(Scope::from_str("me").unwrap(), Scope::Me);
}

#[test]
fn test_scope_parsing_rejects_unknown() {
    assert!(matches!(
        Scope::from_str("bogus"),
        Err(ScopeError::Unknown(raw)) if raw == "bogus"
    ));

    // Case sensitive
    assert!(Scope::from_str("ALL").is_err());
}

#[test]
fn test_parse_optional_treats_empty_as_missing() {
    assert_eq!(Scope::parse_optional(None).unwrap(), None);
    assert_eq!(Scope::parse_optional(Some("")).unwrap(), None);
    assert_eq!(Scope::parse_optional(Some("me")).unwrap(), Some(Scope::Me));
    assert!(Scope::parse_optional(Some("everything")).is_err());
}

#[test]
fn test_scope_display_roundtrip() {
    for scope in Scope::ALL {
        assert_eq!(Scope::from_str(&scope.to_string()).unwrap(), scope);
    }
}

// ============================================================================
// `all` Tests
// ============================================================================

#[test]
fn test_all_matches_without_target() {
    assert!(ScopeEvaluator::evaluate(Scope::All, &[], &[], None, None));
}

#[test]
fn test_all_ignores_fields() {
    let fields = strings(&["a", "b"]);
    assert!(ScopeEvaluator::evaluate(Scope::All, &fields, &[], None, None));
}

// ============================================================================
// `me` Tests
// ============================================================================

#[test]
fn test_me_matches_own_object() {
    let post = json!({"user_id": "u1"});
    let fields = strings(&["user_id"]);
    assert!(ScopeEvaluator::evaluate(Scope::Me, &fields, &[], Some(&post), Some("u1")));
}

#[test]
fn test_me_rejects_other_owner() {
    let post = json!({"user_id": "u2"});
    let fields = strings(&["user_id"]);
    assert!(!ScopeEvaluator::evaluate(Scope::Me, &fields, &[], Some(&post), Some("u1")));
}

#[test]
fn test_me_compares_numbers_as_strings() {
    let post = json!({"author_id": 42});
    let fields = strings(&["author_id"]);
    assert!(ScopeEvaluator::evaluate(Scope::Me, &fields, &[], Some(&post), Some("42")));
}

#[test]
fn test_me_requires_target_and_user() {
    let post = json!({"user_id": "u1"});
    let fields = strings(&["user_id"]);
    assert!(!ScopeEvaluator::evaluate(Scope::Me, &fields, &[], None, Some("u1")));
    assert!(!ScopeEvaluator::evaluate(Scope::Me, &fields, &[], Some(&post), None));
}

#[test]
fn test_me_wrong_arity_fails_closed() {
    let post = json!({"user_id": "u1", "editor_id": "u1"});
    assert!(!ScopeEvaluator::evaluate(Scope::Me, &[], &[], Some(&post), Some("u1")));

    let fields = strings(&["user_id", "editor_id"]);
    assert!(!ScopeEvaluator::evaluate(Scope::Me, &fields, &[], Some(&post), Some("u1")));
}

#[test]
fn test_me_missing_field() {
    let post = json!({"title": "hello"});
    let fields = strings(&["user_id"]);
    assert!(!ScopeEvaluator::evaluate(Scope::Me, &fields, &[], Some(&post), Some("u1")));
}

// ============================================================================
// `related` Tests
// ============================================================================

#[test]
fn test_related_multi_field_and() {
    let target = json!({"group": {"owner_id": "42", "id": 7}});
    let fields = strings(&["group.owner_id", "group.id"]);
    let values = strings(&["42", "7"]);

    assert!(ScopeEvaluator::evaluate(Scope::Related, &fields, &values, Some(&target), None));
}

#[test]
fn test_related_single_mismatch_rejects() {
    let fields = strings(&["group.owner_id", "group.id"]);
    let values = strings(&["42", "7"]);

    let wrong_owner = json!({"group": {"owner_id": "43", "id": 7}});
    let wrong_id = json!({"group": {"owner_id": "42", "id": 8}});

    assert!(!ScopeEvaluator::evaluate(Scope::Related, &fields, &values, Some(&wrong_owner), None));
    assert!(!ScopeEvaluator::evaluate(Scope::Related, &fields, &values, Some(&wrong_id), None));
}

#[test]
fn test_related_arity_mismatch_fails_closed() {
    let target = json!({"a": "1", "b": "2"});
    let fields = strings(&["a", "b"]);
    let values = strings(&["1"]);

    assert!(!ScopeEvaluator::evaluate(Scope::Related, &fields, &values, Some(&target), None));
}

#[test]
fn test_related_requires_target() {
    let fields = strings(&["a"]);
    let values = strings(&["1"]);
    assert!(!ScopeEvaluator::evaluate(Scope::Related, &fields, &values, None, None));
}

#[test]
fn test_related_null_and_composite_never_match() {
    let target = json!({"a": null, "b": ["1"], "c": {"d": "1"}});
    for field in ["a", "b", "c"] {
        let fields = strings(&[field]);
        let values = strings(&["1"]);
        assert!(!ScopeEvaluator::evaluate(Scope::Related, &fields, &values, Some(&target), None));
    }
}

#[test]
fn test_related_bool_compares_as_string() {
    let target = json!({"featured": true});
    let fields = strings(&["featured"]);
    let values = strings(&["true"]);
    assert!(ScopeEvaluator::evaluate(Scope::Related, &fields, &values, Some(&target), None));
}

// ============================================================================
// Path Resolution Tests
// ============================================================================

#[test]
fn test_resolve_path_descends_objects() {
    let target = json!({"a": {"b": {"c": "deep"}}});
    assert_eq!(ScopeEvaluator::resolve_path(&target, "a.b.c"), Some(&json!("deep")));
}

#[test]
fn test_resolve_path_no_array_indexing() {
    let target = json!({"tags": [{"id": "1"}]});
    assert_eq!(ScopeEvaluator::resolve_path(&target, "tags.0.id"), None);
}

#[test]
fn test_resolve_path_empty_segments() {
    let target = json!({"a": "1"});
    assert_eq!(ScopeEvaluator::resolve_path(&target, ""), None);
    assert_eq!(ScopeEvaluator::resolve_path(&target, "a."), None);
}
