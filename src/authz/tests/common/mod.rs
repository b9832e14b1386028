//! Shared fixtures for integration tests

#![allow(dead_code)]

use canthis_authz::store::{
    InMemoryAppStore, InMemoryCatalog, InMemoryObjectStore, InMemoryRoleStore, InMemoryUserStore,
};
use canthis_authz::{
    Authorizer, AuthzStores, EngineConfig, ObjectTypeRegistry, Permission,
};
use std::sync::Arc;

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn edit_post() -> Permission {
    Permission::new("p-edit-post", "Edit posts", "edit", "post")
}

pub fn browse_post() -> Permission {
    Permission::new("p-browse-post", "Browse posts", "browse", "post")
}

pub fn browse_group() -> Permission {
    Permission::new("p-browse-group", "Browse groups", "browse", "group")
}

pub fn edit_group() -> Permission {
    Permission::new("p-edit-group", "Edit groups", "edit", "group")
}

pub fn assign_role() -> Permission {
    Permission::new("p-assign-role", "Assign roles", "assign", "role")
}

pub fn catalog() -> Vec<Permission> {
    vec![edit_post(), browse_post(), browse_group(), edit_group(), assign_role()]
}

/// In-memory world backing an authorizer
pub struct World {
    pub catalog: Arc<InMemoryCatalog>,
    pub roles: Arc<InMemoryRoleStore>,
    pub users: Arc<InMemoryUserStore>,
    pub apps: Arc<InMemoryAppStore>,
    pub posts: Arc<InMemoryObjectStore>,
    pub groups: Arc<InMemoryObjectStore>,
}

impl World {
    pub fn new() -> Self {
        init_tracing();
        Self {
            catalog: Arc::new(InMemoryCatalog::with_permissions(catalog())),
            roles: Arc::new(InMemoryRoleStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            apps: Arc::new(InMemoryAppStore::new()),
            posts: Arc::new(InMemoryObjectStore::new()),
            groups: Arc::new(InMemoryObjectStore::new()),
        }
    }

    pub fn stores(&self) -> AuthzStores {
        AuthzStores {
            catalog: self.catalog.clone(),
            roles: self.roles.clone(),
            users: self.users.clone(),
            apps: self.apps.clone(),
        }
    }

    pub fn registry(&self) -> ObjectTypeRegistry {
        ObjectTypeRegistry::builder()
            .register("post", self.posts.clone())
            .register("group", self.groups.clone())
            .build()
    }

    /// Initialized authorizer with the default config and registry
    pub async fn authorizer(&self) -> Authorizer {
        self.authorizer_with(EngineConfig::default(), self.registry()).await
    }

    pub async fn authorizer_with(&self, config: EngineConfig, registry: ObjectTypeRegistry) -> Authorizer {
        let authorizer = Authorizer::new(config, self.stores(), registry);
        authorizer.init().await.unwrap();
        authorizer
    }
}
