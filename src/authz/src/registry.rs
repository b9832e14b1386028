//! Object type registry
//!
//! Explicit table of authorizable object types, populated once at startup.
//! Each entry supplies a finder that turns raw ids into instances and may
//! supply a `permissible` hook that takes over the final decision.
//!
//! # Example
//!
//! ```rust
//! use canthis_authz::registry::ObjectTypeRegistry;
//! use canthis_authz::store::memory::InMemoryObjectStore;
//! use std::sync::Arc;
//!
//! let registry = ObjectTypeRegistry::builder()
//!     .register("post", Arc::new(InMemoryObjectStore::new()))
//!     .build();
//!
//! assert!(registry.contains("post"));
//! assert!(!registry.contains("tag"));
//! ```

use crate::error::Result;
use crate::permissions::EffectivePermissionSet;
use crate::types::{AuthContext, Instance};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Loads instances of one object type by id
#[async_trait]
pub trait ObjectFinder: Send + Sync {
    /// Load an instance, `None` if the id does not resolve
    async fn find_by_id(&self, id: &str) -> Result<Option<Instance>>;
}

/// Everything a `permissible` hook gets to decide with
#[derive(Debug, Clone)]
pub struct PermissibleRequest {
    /// Resolved target, if any
    pub target: Option<Instance>,

    /// Calling context
    pub context: AuthContext,

    /// Requested action
    pub action_type: String,

    /// Object type of the registry entry
    pub object_type: String,

    /// User's effective permissions, absent without a user
    pub user_grants: Option<Arc<EffectivePermissionSet>>,

    /// App's effective permissions, absent without an app
    pub app_grants: Option<Arc<EffectivePermissionSet>>,

    /// Result of the user grant scan
    pub has_user_permission: bool,

    /// Result of the app grant scan
    pub has_app_permission: bool,
}

/// Per-object-type override of the final decision
///
/// Returning `Ok` resolves the authorization with the given instance;
/// returning `Err(AuthzError::NoPermission)` denies it.
#[async_trait]
pub trait Permissible: Send + Sync {
    /// Decide the outcome
    async fn permissible(&self, request: PermissibleRequest) -> Result<Option<Instance>>;
}

/// Capability set of one object type
#[derive(Clone)]
pub struct ObjectTypeEntry {
    finder: Arc<dyn ObjectFinder>,
    permissible: Option<Arc<dyn Permissible>>,
}

impl ObjectTypeEntry {
    /// Finder for raw ids
    pub fn finder(&self) -> &Arc<dyn ObjectFinder> {
        &self.finder
    }

    /// Override hook, if registered
    pub fn permissible(&self) -> Option<&Arc<dyn Permissible>> {
        self.permissible.as_ref()
    }
}

impl fmt::Debug for ObjectTypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectTypeEntry")
            .field("permissible", &self.permissible.is_some())
            .finish()
    }
}

/// Immutable object type table
#[derive(Debug, Clone, Default)]
pub struct ObjectTypeRegistry {
    entries: HashMap<String, ObjectTypeEntry>,
}

impl ObjectTypeRegistry {
    /// Start building a registry
    pub fn builder() -> ObjectTypeRegistryBuilder {
        ObjectTypeRegistryBuilder::default()
    }

    /// Look up an object type
    pub fn get(&self, object_type: &str) -> Option<&ObjectTypeEntry> {
        self.entries.get(object_type)
    }

    /// Whether the object type is registered
    pub fn contains(&self, object_type: &str) -> bool {
        self.entries.contains_key(object_type)
    }

    /// Registered object type names
    pub fn object_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered object types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`ObjectTypeRegistry`]
#[derive(Default)]
pub struct ObjectTypeRegistryBuilder {
    entries: HashMap<String, ObjectTypeEntry>,
}

impl ObjectTypeRegistryBuilder {
    /// Register an object type with a finder
    ///
    /// Registering the same name twice replaces the earlier entry.
    pub fn register(mut self, object_type: impl Into<String>, finder: Arc<dyn ObjectFinder>) -> Self {
        self.entries.insert(
            object_type.into(),
            ObjectTypeEntry {
                finder,
                permissible: None,
            },
        );
        self
    }

    /// Register an object type with a finder and an override hook
    pub fn register_with_permissible(
        mut self,
        object_type: impl Into<String>,
        finder: Arc<dyn ObjectFinder>,
        permissible: Arc<dyn Permissible>,
    ) -> Self {
        self.entries.insert(
            object_type.into(),
            ObjectTypeEntry {
                finder,
                permissible: Some(permissible),
            },
        );
        self
    }

    /// Finish building
    pub fn build(self) -> ObjectTypeRegistry {
        ObjectTypeRegistry {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthzError;
    use crate::store::memory::InMemoryObjectStore;

    struct DenyAll;

    #[async_trait]
    impl Permissible for DenyAll {
        async fn permissible(&self, _request: PermissibleRequest) -> Result<Option<Instance>> {
            Err(AuthzError::NoPermission)
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ObjectTypeRegistry::builder()
            .register("post", Arc::new(InMemoryObjectStore::new()))
            .register_with_permissible("role", Arc::new(InMemoryObjectStore::new()), Arc::new(DenyAll))
            .build();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("post").unwrap().permissible().is_none());
        assert!(registry.get("role").unwrap().permissible().is_some());
        assert!(registry.get("tag").is_none());
    }

    #[test]
    fn test_reregistration_replaces_entry() {
        let registry = ObjectTypeRegistry::builder()
            .register_with_permissible("post", Arc::new(InMemoryObjectStore::new()), Arc::new(DenyAll))
            .register("post", Arc::new(InMemoryObjectStore::new()))
            .build();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("post").unwrap().permissible().is_none());
    }
}
