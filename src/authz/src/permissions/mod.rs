//! Effective permission resolution
//!
//! A principal's effective permissions are the union of the grants carried by
//! each of its roles and its direct grants, deduplicated by
//! `(action_type, object_type, scope, first value)`.
//!
//! # Example
//!
//! ```rust
//! use canthis_authz::permissions::EffectivePermissionResolver;
//! use canthis_authz::store::{InMemoryAppStore, InMemoryRoleStore, InMemoryUserStore};
//! use canthis_authz::types::{Permission, PermissionGrant, Role, User};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let browse = Permission::new("p1", "Browse groups", "browse", "group");
//!
//! let roles = Arc::new(InMemoryRoleStore::new());
//! roles.put(Role::new("r1", "Member").with_grant(PermissionGrant::all(browse.clone()))).await;
//! roles.put(Role::new("r2", "Viewer").with_grant(PermissionGrant::all(browse))).await;
//!
//! let users = Arc::new(InMemoryUserStore::new());
//! users.put(User::new("u1").with_role("r1").with_role("r2")).await;
//!
//! let resolver = EffectivePermissionResolver::new(users, roles, Arc::new(InMemoryAppStore::new()));
//! let set = resolver.resolve_for_user("u1").await?;
//! assert_eq!(set.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod effective;
pub mod resolver;


pub use effective::{EffectiveGrant, EffectivePermissionSet};
pub use resolver::EffectivePermissionResolver;
