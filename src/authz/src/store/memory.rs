//! In-memory store implementations
//!
//! Reference implementations of every collaborator trait, backed by
//! `tokio::sync::RwLock`. Useful for embedding without a database and as
//! test fixtures.

use super::{AppStore, PermissionCatalogStore, RoleStore, UserStore};
use crate::error::Result;
use crate::registry::ObjectFinder;
use crate::types::{App, Instance, Permission, Role, User};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory permission catalog, listed in insertion order
#[derive(Default)]
pub struct InMemoryCatalog {
    permissions: Arc<RwLock<Vec<Permission>>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from permissions
    pub fn with_permissions(permissions: Vec<Permission>) -> Self {
        Self {
            permissions: Arc::new(RwLock::new(permissions)),
        }
    }

    /// Append a permission
    pub async fn insert(&self, permission: Permission) {
        self.permissions.write().await.push(permission);
    }

    /// Remove a permission by id
    pub async fn remove(&self, id: &str) {
        self.permissions.write().await.retain(|p| p.id != id);
    }
}

#[async_trait]
impl PermissionCatalogStore for InMemoryCatalog {
    async fn find_all(&self) -> Result<Vec<Permission>> {
        Ok(self.permissions.read().await.clone())
    }
}

/// In-memory role store
#[derive(Default)]
pub struct InMemoryRoleStore {
    roles: Arc<RwLock<HashMap<String, Role>>>,
}

impl InMemoryRoleStore {
    /// Create an empty role store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace a role
    pub async fn put(&self, role: Role) {
        self.roles.write().await.insert(role.id.clone(), role);
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn find_with_grants(&self, role_ids: &[String]) -> Result<Vec<Role>> {
        let roles = self.roles.read().await;
        Ok(role_ids.iter().filter_map(|id| roles.get(id).cloned()).collect())
    }
}

/// In-memory user store
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    /// Create an empty user store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace a user
    pub async fn put(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_with_roles_and_grants(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }
}

/// In-memory app store
#[derive(Default)]
pub struct InMemoryAppStore {
    apps: Arc<RwLock<HashMap<String, App>>>,
}

impl InMemoryAppStore {
    /// Create an empty app store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace an app
    pub async fn put(&self, app: App) {
        self.apps.write().await.insert(app.id.clone(), app);
    }
}

#[async_trait]
impl AppStore for InMemoryAppStore {
    async fn find_with_grants(&self, app_id: &str) -> Result<Option<App>> {
        Ok(self.apps.read().await.get(app_id).cloned())
    }
}

/// In-memory instances of one object type, keyed by id
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Instance>>>,
}

impl InMemoryObjectStore {
    /// Create an empty object store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace an instance
    pub async fn put(&self, id: impl Into<String>, instance: Instance) {
        self.objects.write().await.insert(id.into(), instance);
    }
}

#[async_trait]
impl ObjectFinder for InMemoryObjectStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Instance>> {
        Ok(self.objects.read().await.get(id).cloned())
    }
}
