//! Collaborator store interfaces
//!
//! The engine never persists anything. It reads permission, role and
//! principal records through these traits, which the persistence layer
//! implements. Errors returned by a store reach the caller unchanged.

use crate::error::Result;
use crate::types::{App, Permission, Role, User};
use async_trait::async_trait;

pub mod memory;

pub use memory::{
    InMemoryAppStore, InMemoryCatalog, InMemoryObjectStore, InMemoryRoleStore, InMemoryUserStore,
};

/// Source of the permission catalog
#[async_trait]
pub trait PermissionCatalogStore: Send + Sync {
    /// List every permission in the catalog
    async fn find_all(&self) -> Result<Vec<Permission>>;
}

/// Role lookup with grants populated
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Load the given roles; unknown ids are skipped
    async fn find_with_grants(&self, role_ids: &[String]) -> Result<Vec<Role>>;
}

/// User lookup with role ids and direct grants populated
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Load a user, `None` if the id does not resolve
    async fn find_with_roles_and_grants(&self, user_id: &str) -> Result<Option<User>>;
}

/// App lookup with direct grants populated
#[async_trait]
pub trait AppStore: Send + Sync {
    /// Load an app, `None` if the id does not resolve
    async fn find_with_grants(&self, app_id: &str) -> Result<Option<App>>;
}
