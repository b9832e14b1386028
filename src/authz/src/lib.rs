//! # Canthis Authorization Engine
//!
//! Capability-based authorization: decides whether a user or an application
//! may perform an action on an object, under an `all`, `related` or `me`
//! scope.
//!
//! ## Features
//!
//! - **Role inheritance** with earliest-definition-wins deduplication
//! - **Scoped grants** evaluated against live object data
//! - **Per-object-type overrides** through `permissible` hooks
//! - **Async-first design**: grant and target loads run concurrently on Tokio
//! - **Atomic catalog refresh**: queries always see one complete action map
//!
//! ## Example
//!
//! ```rust
//! use canthis_authz::{AuthContext, Authorizer, AuthzError, AuthzStores, EngineConfig, ObjectTypeRegistry};
//! use canthis_authz::store::{InMemoryAppStore, InMemoryCatalog, InMemoryRoleStore, InMemoryUserStore};
//! use canthis_authz::types::{Permission, PermissionGrant, Role, Target, User};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let browse = Permission::new("p1", "Browse groups", "browse", "group");
//!
//!     let roles = Arc::new(InMemoryRoleStore::new());
//!     roles.put(Role::new("r1", "Member").with_grant(PermissionGrant::all(browse.clone()))).await;
//!
//!     let users = Arc::new(InMemoryUserStore::new());
//!     users.put(User::new("alice").with_role("r1")).await;
//!
//!     let authorizer = Authorizer::new(
//!         EngineConfig::default(),
//!         AuthzStores {
//!             catalog: Arc::new(InMemoryCatalog::with_permissions(vec![browse])),
//!             roles,
//!             users,
//!             apps: Arc::new(InMemoryAppStore::new()),
//!         },
//!         ObjectTypeRegistry::default(),
//!     );
//!     authorizer.init().await?;
//!
//!     let query = authorizer.can_this(AuthContext::user("alice"))?;
//!     query.evaluate("browse", "group", Target::None, None).await?;
//!
//!     let anonymous = authorizer.can_this(AuthContext::anonymous())?;
//!     let denied = anonymous.evaluate("browse", "group", Target::None, None).await;
//!     assert!(matches!(denied, Err(AuthzError::NoPermission)));
//!
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod error;
pub mod scope;
pub mod store;
pub mod permissions;
pub mod catalog;
pub mod registry;
pub mod engine;

// Re-export commonly used types
pub use types::{
    App, AuthContext, Instance, Permission, PermissionGrant, Role, Target, User,
    ActionType, ObjectType, PermissionId, RoleId,
};
pub use engine::{
    ActionEvaluators, AuthorizationQuery, Authorizer, AuthzStores, EngineConfig, EngineMetrics,
    Evaluator,
};
pub use catalog::{ActionMap, PermissionCatalog};
pub use permissions::{EffectiveGrant, EffectivePermissionResolver, EffectivePermissionSet};
pub use registry::{ObjectFinder, ObjectTypeRegistry, Permissible, PermissibleRequest};
pub use error::{AuthzError, Result};
pub use scope::{Scope, ScopeError, ScopeEvaluator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
