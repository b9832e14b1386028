//! Effective permission resolution
//!
//! Loads a principal's grants from the collaborator stores and merges them
//! into an [`EffectivePermissionSet`]. Nothing is cached: every call reads the
//! stores again, so grant changes are visible to the next query.

use super::effective::EffectivePermissionSet;
use crate::error::{AuthzError, Result};
use crate::store::{AppStore, RoleStore, UserStore};
use std::sync::Arc;
use tracing::debug;

/// Merges direct and role-inherited grants for users and apps
#[derive(Clone)]
pub struct EffectivePermissionResolver {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    apps: Arc<dyn AppStore>,
}

impl EffectivePermissionResolver {
    /// Create a resolver over the given stores
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        apps: Arc<dyn AppStore>,
    ) -> Self {
        Self { users, roles, apps }
    }

    /// Resolve a user's effective permissions
    ///
    /// Role grants come first, in the order the user holds the roles,
    /// followed by the user's direct grants. Deduplication keeps the earliest
    /// definition of each key.
    ///
    /// # Errors
    ///
    /// - [`AuthzError::NotFound`] if the user does not exist
    /// - any store error, unchanged
    pub async fn resolve_for_user(&self, user_id: &str) -> Result<EffectivePermissionSet> {
        let user = self
            .users
            .find_with_roles_and_grants(user_id)
            .await?
            .ok_or_else(|| AuthzError::NotFound(format!("User '{}'", user_id)))?;

        let roles = if user.roles.is_empty() {
            Vec::new()
        } else {
            self.roles.find_with_grants(&user.roles).await?
        };

        let mut set = EffectivePermissionSet::new();

        // Stores may return roles in any order; follow the user's order
        for role_id in &user.roles {
            if let Some(role) = roles.iter().find(|role| &role.id == role_id) {
                set.extend(&role.grants);
            }
        }
        set.extend(&user.grants);

        debug!(
            "Resolved {} effective grants for user {} ({} roles)",
            set.len(),
            user_id,
            user.roles.len()
        );

        Ok(set)
    }

    /// Resolve an app's effective permissions (direct grants only)
    ///
    /// # Errors
    ///
    /// - [`AuthzError::NotFound`] if the app does not exist
    /// - any store error, unchanged
    pub async fn resolve_for_app(&self, app_id: &str) -> Result<EffectivePermissionSet> {
        let app = self
            .apps
            .find_with_grants(app_id)
            .await?
            .ok_or_else(|| AuthzError::NotFound(format!("App '{}'", app_id)))?;

        let mut set = EffectivePermissionSet::new();
        set.extend(&app.grants);

        debug!("Resolved {} effective grants for app {}", set.len(), app_id);

        Ok(set)
    }
}
