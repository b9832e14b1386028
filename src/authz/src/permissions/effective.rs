//! Effective permission set: the deduplicated, denormalized grants of one
//! principal

use crate::scope::{Scope, ScopeEvaluator};
use crate::types::{ActionType, Instance, ObjectType, PermissionGrant};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A grant flattened with its permission's action and object type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveGrant {
    /// Granted action
    pub action_type: ActionType,

    /// Object type the action applies to
    pub object_type: ObjectType,

    /// Scope qualifier
    pub scope: Scope,

    /// Field paths read off the target
    pub fields: Vec<String>,

    /// Expected values, index-aligned with `fields`
    pub values: Vec<String>,
}

impl EffectiveGrant {
    /// Whether this grant is for the given action, object type and scope
    pub fn applies_to(&self, action_type: &str, object_type: &str, scope: Scope) -> bool {
        self.action_type == action_type && self.object_type == object_type && self.scope == scope
    }

    /// Whether the grant's scope predicate holds for the target and actor
    pub fn is_satisfied_by(&self, target: Option<&Instance>, user_id: Option<&str>) -> bool {
        ScopeEvaluator::evaluate(self.scope, &self.fields, &self.values, target, user_id)
    }

    fn key(&self) -> GrantKey {
        GrantKey {
            action_type: self.action_type.clone(),
            object_type: self.object_type.clone(),
            scope: self.scope,
            first_value: self.values.first().cloned(),
        }
    }
}

impl From<&PermissionGrant> for EffectiveGrant {
    fn from(grant: &PermissionGrant) -> Self {
        Self {
            action_type: grant.permission.action_type.clone(),
            object_type: grant.permission.object_type.clone(),
            scope: grant.scope,
            fields: grant.fields.clone(),
            values: grant.values.clone(),
        }
    }
}

/// Composite deduplication key
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct GrantKey {
    action_type: ActionType,
    object_type: ObjectType,
    scope: Scope,
    first_value: Option<String>,
}

/// Ordered grants with no two sharing
/// `(action_type, object_type, scope, first value)`
///
/// Built per query and discarded afterwards. Insertion keeps the earliest
/// definition of a key and drops later ones.
#[derive(Debug, Clone, Default)]
pub struct EffectivePermissionSet {
    grants: Vec<EffectiveGrant>,
    seen: HashSet<GrantKey>,
}

impl EffectivePermissionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a grant unless its key is already present
    ///
    /// Returns `true` if the grant was added.
    pub fn insert(&mut self, grant: EffectiveGrant) -> bool {
        if !self.seen.insert(grant.key()) {
            return false;
        }
        self.grants.push(grant);
        true
    }

    /// Insert every grant in order
    pub fn extend<'a, I>(&mut self, grants: I)
    where
        I: IntoIterator<Item = &'a PermissionGrant>,
    {
        for grant in grants {
            self.insert(EffectiveGrant::from(grant));
        }
    }

    /// First grant for `(action_type, object_type, scope)` whose predicate
    /// holds for the target and actor
    pub fn find_match(
        &self,
        action_type: &str,
        object_type: &str,
        scope: Scope,
        target: Option<&Instance>,
        user_id: Option<&str>,
    ) -> Option<&EffectiveGrant> {
        self.grants
            .iter()
            .filter(|grant| grant.applies_to(action_type, object_type, scope))
            .find(|grant| grant.is_satisfied_by(target, user_id))
    }

    /// Whether any grant permits the action on the target
    pub fn permits(
        &self,
        action_type: &str,
        object_type: &str,
        scope: Scope,
        target: Option<&Instance>,
        user_id: Option<&str>,
    ) -> bool {
        self.find_match(action_type, object_type, scope, target, user_id)
            .is_some()
    }

    /// Grants in insertion order
    pub fn grants(&self) -> &[EffectiveGrant] {
        &self.grants
    }

    /// Iterate over grants in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, EffectiveGrant> {
        self.grants.iter()
    }

    /// Number of grants
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether the set holds no grants
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl<'a> IntoIterator for &'a EffectivePermissionSet {
    type Item = &'a EffectiveGrant;
    type IntoIter = std::slice::Iter<'a, EffectiveGrant>;

    fn into_iter(self) -> Self::IntoIter {
        self.grants.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Permission;
    use serde_json::json;

    fn edit_post() -> Permission {
        Permission::new("p1", "Edit posts", "edit", "post")
    }

    #[test]
    fn test_first_definition_wins() {
        let mut set = EffectivePermissionSet::new();
        let first = PermissionGrant::me(edit_post(), "author_id");
        let second = PermissionGrant::me(edit_post(), "editor_id");

        set.extend([&first, &second]);

        assert_eq!(set.len(), 1);
        assert_eq!(set.grants()[0].fields, vec!["author_id".to_string()]);
    }

    #[test]
    fn test_distinct_first_values_are_kept() {
        let mut set = EffectivePermissionSet::new();
        let a = PermissionGrant::related(edit_post(), ["group_id"], ["1"]);
        let b = PermissionGrant::related(edit_post(), ["group_id"], ["2"]);

        set.extend([&a, &b]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_scope_is_part_of_key() {
        let mut set = EffectivePermissionSet::new();
        assert!(set.insert(EffectiveGrant::from(&PermissionGrant::all(edit_post()))));
        assert!(set.insert(EffectiveGrant::from(&PermissionGrant::me(edit_post(), "user_id"))));
        assert!(!set.insert(EffectiveGrant::from(&PermissionGrant::all(edit_post()))));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_find_match_filters_by_scope() {
        let mut set = EffectivePermissionSet::new();
        set.extend([&PermissionGrant::me(edit_post(), "user_id")]);

        let post = json!({"user_id": "u1"});
        assert!(set.permits("edit", "post", Scope::Me, Some(&post), Some("u1")));
        assert!(!set.permits("edit", "post", Scope::All, Some(&post), Some("u1")));
        assert!(!set.permits("browse", "post", Scope::Me, Some(&post), Some("u1")));
    }
}
