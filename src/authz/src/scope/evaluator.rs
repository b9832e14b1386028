/// Scope predicates evaluated against a target instance
///
/// Every predicate fails closed: malformed grants (wrong arity, missing
/// fields) never match and never panic.

use std::borrow::Cow;

use serde_json::Value;
use tracing::trace;

use super::types::Scope;

/// Stateless evaluator for the three scope kinds
pub struct ScopeEvaluator;

impl ScopeEvaluator {
    /// Evaluates a scope predicate
    ///
    /// # Arguments
    ///
    /// * `scope` - Scope of the grant
    /// * `fields` - Field paths of the grant
    /// * `values` - Expected values of the grant, index-aligned with `fields`
    /// * `target` - Target instance, if any
    /// * `user_id` - Acting user's id, if any
    pub fn evaluate(
        scope: Scope,
        fields: &[String],
        values: &[String],
        target: Option<&Value>,
        user_id: Option<&str>,
    ) -> bool {
        match scope {
            Scope::All => true,
            Scope::Me => Self::matches_me(fields, target, user_id),
            Scope::Related => Self::matches_related(fields, values, target),
        }
    }

    /// `me`: the single field on the target equals the acting user's id
    fn matches_me(fields: &[String], target: Option<&Value>, user_id: Option<&str>) -> bool {
        let (Some(target), Some(user_id)) = (target, user_id) else {
            return false;
        };

        let [field] = fields else {
            trace!("'me' grant with {} fields never matches", fields.len());
            return false;
        };

        Self::resolve_path(target, field)
            .and_then(Self::comparable)
            .is_some_and(|actual| actual == user_id)
    }

    /// `related`: every field path on the target equals its expected value
    fn matches_related(fields: &[String], values: &[String], target: Option<&Value>) -> bool {
        let Some(target) = target else {
            return false;
        };

        if fields.len() != values.len() {
            trace!(
                "'related' grant with {} fields and {} values never matches",
                fields.len(),
                values.len()
            );
            return false;
        }

        fields.iter().zip(values).all(|(field, expected)| {
            Self::resolve_path(target, field)
                .and_then(Self::comparable)
                .is_some_and(|actual| actual == expected.as_str())
        })
    }

    /// Resolves a dotted path by plain property descent
    ///
    /// `"group.owner_id"` reads `target["group"]["owner_id"]`. No wildcards and
    /// no array indexing; descending through a non-object yields `None`.
    pub fn resolve_path<'a>(target: &'a Value, path: &str) -> Option<&'a Value> {
        if path.is_empty() {
            return None;
        }

        path.split('.')
            .try_fold(target, |current, segment| current.as_object()?.get(segment))
    }

    /// String form used for equality; composite and null values never compare
    fn comparable(value: &Value) -> Option<Cow<'_, str>> {
        match value {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}
