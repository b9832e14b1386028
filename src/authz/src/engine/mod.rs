//! Authorization engine
//!
//! Ties the permission catalog, the effective permission resolver and the
//! object type registry together behind [`Authorizer::can_this`].

pub mod metrics;
pub mod query;

pub use metrics::{DecisionOutcome, EngineMetrics, MetricsCollector};
pub use query::{ActionEvaluators, AuthorizationQuery, Evaluator};

use crate::catalog::{ActionMap, PermissionCatalog};
use crate::error::{AuthzError, Result};
use crate::permissions::EffectivePermissionResolver;
use crate::registry::ObjectTypeRegistry;
use crate::scope::Scope;
use crate::store::{AppStore, PermissionCatalogStore, RoleStore, UserStore};
use crate::types::AuthContext;

use std::sync::Arc;
use tracing::info;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Enable decision metrics collection
    pub enable_metrics: bool,

    /// Deny every non-internal check made without an app context
    ///
    /// Off by default: a context without an app is not app-restricted.
    pub require_app_context: bool,

    /// Scope used when a check gives none
    pub default_scope: Scope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
            require_app_context: false,
            default_scope: Scope::All,
        }
    }
}

/// Collaborator stores the engine reads from
#[derive(Clone)]
pub struct AuthzStores {
    /// Permission catalog
    pub catalog: Arc<dyn PermissionCatalogStore>,
    /// Roles with grants
    pub roles: Arc<dyn RoleStore>,
    /// Users with roles and grants
    pub users: Arc<dyn UserStore>,
    /// Apps with grants
    pub apps: Arc<dyn AppStore>,
}

/// Capability-based authorizer
///
/// # Architecture
///
/// ```text
/// init()/refresh() → PermissionCatalog → ActionMap snapshot
///                                              ↓
/// can_this(ctx) → AuthorizationQuery ─┬─ user grants ─┐
///                                     ├─ app grants ──┼─► ScopeEvaluator → permissible? → outcome
///                                     └─ target ──────┘
/// ```
///
/// # Example
///
/// ```rust
/// use canthis_authz::{AuthContext, Authorizer, AuthzStores, EngineConfig, ObjectTypeRegistry};
/// use canthis_authz::store::{InMemoryAppStore, InMemoryCatalog, InMemoryRoleStore, InMemoryUserStore};
/// use canthis_authz::types::{Permission, PermissionGrant, User};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let edit_post = Permission::new("p1", "Edit posts", "edit", "post");
///
/// let users = Arc::new(InMemoryUserStore::new());
/// users.put(User::new("u1").with_grant(PermissionGrant::me(edit_post.clone(), "author_id"))).await;
///
/// let stores = AuthzStores {
///     catalog: Arc::new(InMemoryCatalog::with_permissions(vec![edit_post])),
///     roles: Arc::new(InMemoryRoleStore::new()),
///     users,
///     apps: Arc::new(InMemoryAppStore::new()),
/// };
///
/// let authorizer = Authorizer::new(EngineConfig::default(), stores, ObjectTypeRegistry::default());
/// authorizer.init().await?;
///
/// let post = json!({"id": "1", "author_id": "u1"});
/// let query = authorizer.can_this(AuthContext::user("u1"))?;
/// let allowed = query.action("edit")?.object("post")?.check(post.clone(), Some("me")).await?;
/// assert_eq!(allowed, Some(post));
/// # Ok(())
/// # }
/// ```
pub struct Authorizer {
    catalog: Arc<PermissionCatalog>,
    resolver: Arc<EffectivePermissionResolver>,
    registry: Arc<ObjectTypeRegistry>,
    metrics: Option<Arc<MetricsCollector>>,
    config: EngineConfig,
}

impl Authorizer {
    /// Create an authorizer; call [`Authorizer::init`] before opening queries
    pub fn new(config: EngineConfig, stores: AuthzStores, registry: ObjectTypeRegistry) -> Self {
        let catalog = Arc::new(PermissionCatalog::new(stores.catalog));
        let resolver = Arc::new(EffectivePermissionResolver::new(
            stores.users,
            stores.roles,
            stores.apps,
        ));

        let metrics = if config.enable_metrics {
            Some(Arc::new(MetricsCollector::new()))
        } else {
            None
        };

        info!(
            "Authorizer created: {} object types, metrics={}, require_app_context={}",
            registry.len(),
            config.enable_metrics,
            config.require_app_context
        );

        Self {
            catalog,
            resolver,
            registry: Arc::new(registry),
            metrics,
            config,
        }
    }

    /// Load the permission catalog and build the action map
    pub async fn init(&self) -> Result<()> {
        self.catalog.init().await
    }

    /// Rebuild the action map; queries already open keep their snapshot
    pub async fn refresh(&self) -> Result<()> {
        self.catalog.refresh().await
    }

    /// Current action map snapshot
    pub fn action_map(&self) -> Option<Arc<ActionMap>> {
        self.catalog.snapshot()
    }

    /// Open an authorization query for a calling context
    ///
    /// Starts the user and app grant loads without waiting for them.
    ///
    /// # Errors
    ///
    /// [`AuthzError::Configuration`] if the action map is missing or empty
    pub fn can_this(&self, context: AuthContext) -> Result<AuthorizationQuery> {
        let actions = self
            .catalog
            .snapshot()
            .filter(|map| !map.is_empty())
            .ok_or_else(|| AuthzError::Configuration("No actions map found".to_string()))?;

        Ok(AuthorizationQuery::begin(
            context,
            &actions,
            self.resolver.clone(),
            self.registry.clone(),
            self.config.clone(),
            self.metrics.clone(),
        ))
    }

    /// Object type registry
    pub fn registry(&self) -> &ObjectTypeRegistry {
        &self.registry
    }

    /// Get engine metrics
    pub fn get_metrics(&self) -> Option<EngineMetrics> {
        self.metrics.as_ref().map(|metrics| metrics.get_metrics())
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> Option<String> {
        self.metrics.as_ref().map(|metrics| metrics.export_prometheus())
    }
}
