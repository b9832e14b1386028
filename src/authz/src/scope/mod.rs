/// Scope qualifiers and their predicates
///
/// A grant is narrowed by one of three scopes: `all` matches every target,
/// `related` requires every listed field path on the target to equal its
/// expected value, and `me` requires one field on the target to equal the
/// acting user's id.
///
/// # Examples
///
/// ```
/// use canthis_authz::scope::{Scope, ScopeEvaluator};
/// use serde_json::json;
///
/// let post = json!({"user_id": "7"});
/// let fields = vec!["user_id".to_string()];
///
/// assert!(ScopeEvaluator::evaluate(Scope::Me, &fields, &[], Some(&post), Some("7")));
/// assert!(!ScopeEvaluator::evaluate(Scope::Me, &fields, &[], Some(&post), Some("8")));
/// ```

mod types;
mod evaluator;

#[cfg(test)]
mod tests;

pub use types::{Scope, ScopeError, ScopeResult};
pub use evaluator::ScopeEvaluator;
