//! Authorization query ("can this")
//!
//! A query is bound to one calling context. Opening it starts the user and
//! app grant loads in the background; each evaluator call then starts the
//! target load and awaits all three together.
//!
//! ```text
//! can_this(ctx) ──┬─ spawn user grant load ─┐
//!                 └─ spawn app grant load ──┤
//! check(target) ──── target load ───────────┴─► scope scan ─► permissible? ─► outcome
//! ```

use super::metrics::{DecisionOutcome, MetricsCollector};
use super::EngineConfig;
use crate::catalog::ActionMap;
use crate::error::{AuthzError, Result};
use crate::permissions::{EffectivePermissionResolver, EffectivePermissionSet};
use crate::registry::{ObjectFinder, ObjectTypeRegistry, PermissibleRequest};
use crate::scope::Scope;
use crate::types::{AuthContext, Instance, Target};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Shared, possibly still running, grant load; `None` when skipped
type GrantLoad = Shared<BoxFuture<'static, Result<Option<Arc<EffectivePermissionSet>>>>>;

/// State shared by every evaluator of one query
struct QueryState {
    id: Uuid,
    context: AuthContext,
    user_load: GrantLoad,
    app_load: GrantLoad,
    registry: Arc<ObjectTypeRegistry>,
    config: EngineConfig,
    metrics: Option<Arc<MetricsCollector>>,
}

/// Authorization query bound to a calling context
///
/// Exposes one [`Evaluator`] per `(action_type, object_type)` pair of the
/// action map snapshot the query was opened with.
pub struct AuthorizationQuery {
    state: Arc<QueryState>,
    actions: HashMap<String, ActionEvaluators>,
}

impl AuthorizationQuery {
    pub(crate) fn begin(
        context: AuthContext,
        actions: &ActionMap,
        resolver: Arc<EffectivePermissionResolver>,
        registry: Arc<ObjectTypeRegistry>,
        config: EngineConfig,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        let id = Uuid::new_v4();

        let user_load = match (&context.user_id, context.internal) {
            (Some(user_id), false) => {
                let resolver = resolver.clone();
                let user_id = user_id.clone();
                start_load(async move { resolver.resolve_for_user(&user_id).await })
            }
            _ => skipped_load(),
        };

        let app_load = match (&context.app_id, context.internal) {
            (Some(app_id), false) => {
                let app_id = app_id.clone();
                start_load(async move { resolver.resolve_for_app(&app_id).await })
            }
            _ => skipped_load(),
        };

        debug!(
            "Query {} opened: internal={}, user={:?}, app={:?}",
            id, context.internal, context.user_id, context.app_id
        );

        let state = Arc::new(QueryState {
            id,
            context,
            user_load,
            app_load,
            registry,
            config,
            metrics,
        });

        let actions = actions
            .iter()
            .map(|(action_type, object_types)| {
                let objects = object_types
                    .iter()
                    .map(|object_type| {
                        let evaluator = Evaluator {
                            state: state.clone(),
                            action_type: action_type.to_string(),
                            object_type: object_type.clone(),
                        };
                        (object_type.clone(), evaluator)
                    })
                    .collect();

                let evaluators = ActionEvaluators {
                    action_type: action_type.to_string(),
                    objects,
                };
                (action_type.to_string(), evaluators)
            })
            .collect();

        Self { state, actions }
    }

    /// Query id, included in every log line the query emits
    pub fn id(&self) -> Uuid {
        self.state.id
    }

    /// Context the query is bound to
    pub fn context(&self) -> &AuthContext {
        &self.state.context
    }

    /// Evaluators for one action
    ///
    /// # Errors
    ///
    /// [`AuthzError::UnknownCapability`] if the action is not in the snapshot
    pub fn action(&self, action_type: &str) -> Result<&ActionEvaluators> {
        self.actions
            .get(action_type)
            .ok_or_else(|| AuthzError::UnknownCapability {
                action_type: action_type.to_string(),
                object_type: None,
            })
    }

    /// Evaluator for one action/object type pair, if exposed
    pub fn evaluator(&self, action_type: &str, object_type: &str) -> Option<&Evaluator> {
        self.actions.get(action_type)?.objects.get(object_type)
    }

    /// Action names exposed by this query
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Check whether the context may perform `action_type` on `object_type`
    ///
    /// Resolves to the target instance on success (`None` for an internal
    /// context or an absent target).
    ///
    /// # Errors
    ///
    /// - [`AuthzError::UnknownCapability`] if the pair is not in the snapshot
    /// - [`AuthzError::InvalidScope`] for a scope outside `all`/`related`/`me`
    /// - [`AuthzError::NoPermission`] when denied
    /// - any load error, unchanged
    pub async fn evaluate(
        &self,
        action_type: &str,
        object_type: &str,
        target: impl Into<Target>,
        scope: Option<&str>,
    ) -> Result<Option<Instance>> {
        let evaluator = self.evaluator(action_type, object_type).ok_or_else(|| {
            AuthzError::UnknownCapability {
                action_type: action_type.to_string(),
                object_type: Some(object_type.to_string()),
            }
        })?;

        evaluator.check(target, scope).await
    }
}

/// Evaluators of one action, keyed by object type
pub struct ActionEvaluators {
    action_type: String,
    objects: HashMap<String, Evaluator>,
}

impl ActionEvaluators {
    /// Evaluator for an object type
    ///
    /// # Errors
    ///
    /// [`AuthzError::UnknownCapability`] if the action does not apply to it
    pub fn object(&self, object_type: &str) -> Result<&Evaluator> {
        self.objects
            .get(object_type)
            .ok_or_else(|| AuthzError::UnknownCapability {
                action_type: self.action_type.clone(),
                object_type: Some(object_type.to_string()),
            })
    }

    /// Object types this action applies to
    pub fn object_types(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }
}

/// Check for one `(action_type, object_type)` pair of a query
#[derive(Clone)]
pub struct Evaluator {
    state: Arc<QueryState>,
    action_type: String,
    object_type: String,
}

impl Evaluator {
    /// Action this evaluator checks
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Object type this evaluator checks
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Run the check against a target under a scope (default `all`)
    pub async fn check(
        &self,
        target: impl Into<Target>,
        scope: Option<&str>,
    ) -> Result<Option<Instance>> {
        let start = Instant::now();
        let result = self.run(target.into(), scope).await;

        let (outcome, result) = match result {
            Ok((instance, outcome)) => (outcome, Ok(instance)),
            Err((e, outcome)) => (outcome, Err(e)),
        };

        if let Some(metrics) = &self.state.metrics {
            metrics.record_outcome(outcome);
            metrics.record_latency(start.elapsed());
        }

        result
    }

    async fn run(
        &self,
        target: Target,
        scope: Option<&str>,
    ) -> std::result::Result<(Option<Instance>, DecisionOutcome), (AuthzError, DecisionOutcome)> {
        let state = &self.state;

        if state.context.internal {
            debug!(
                "Query {}: internal bypass for {} {}",
                state.id, self.action_type, self.object_type
            );
            return Ok((None, DecisionOutcome::Bypassed));
        }

        let scope = Scope::parse_optional(scope)
            .map_err(|e| (AuthzError::from(e), DecisionOutcome::Error))?
            .unwrap_or(state.config.default_scope);

        let entry = state.registry.get(&self.object_type);
        let target_load = load_target(entry.map(|e| e.finder().clone()), target, &self.object_type);

        let (user_grants, app_grants, target) =
            tokio::try_join!(state.user_load.clone(), state.app_load.clone(), target_load)
                .map_err(|e| {
                    warn!(
                        "Query {}: load failed for {} {}: {}",
                        state.id, self.action_type, self.object_type, e
                    );
                    (e, DecisionOutcome::Error)
                })?;

        let user_id = state.context.user_id.as_deref();

        let has_user_permission = user_grants.as_deref().is_some_and(|set| {
            set.permits(&self.action_type, &self.object_type, scope, target.as_ref(), user_id)
        });

        let has_app_permission = match app_grants.as_deref() {
            Some(set) => {
                set.permits(&self.action_type, &self.object_type, scope, target.as_ref(), user_id)
            }
            None => !state.config.require_app_context,
        };

        if let Some(hook) = entry.and_then(|e| e.permissible()) {
            debug!(
                "Query {}: {} {} delegated to permissible hook (user={}, app={})",
                state.id, self.action_type, self.object_type, has_user_permission, has_app_permission
            );

            let request = PermissibleRequest {
                target,
                context: state.context.clone(),
                action_type: self.action_type.clone(),
                object_type: self.object_type.clone(),
                user_grants,
                app_grants,
                has_user_permission,
                has_app_permission,
            };

            return match hook.permissible(request).await {
                Ok(instance) => Ok((instance, DecisionOutcome::OverrideAllowed)),
                Err(e) if e.is_denial() => Err((e, DecisionOutcome::OverrideDenied)),
                Err(e) => Err((e, DecisionOutcome::Error)),
            };
        }

        if has_user_permission && has_app_permission {
            debug!(
                "Query {}: ALLOW {} {} (scope={})",
                state.id, self.action_type, self.object_type, scope
            );
            Ok((target, DecisionOutcome::Allowed))
        } else {
            debug!(
                "Query {}: DENY {} {} (scope={}, user={}, app={})",
                state.id,
                self.action_type,
                self.object_type,
                scope,
                has_user_permission,
                has_app_permission
            );
            Err((AuthzError::NoPermission, DecisionOutcome::Denied))
        }
    }
}

/// Start a grant load in the background when a runtime is available
///
/// Without a runtime the load runs lazily, on the first evaluator that
/// awaits it.
fn start_load<F>(load: F) -> GrantLoad
where
    F: Future<Output = Result<EffectivePermissionSet>> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let task = handle.spawn(load);
            async move {
                match task.await {
                    Ok(result) => result.map(|set| Some(Arc::new(set))),
                    Err(e) => Err(AuthzError::Internal(format!("grant load task failed: {}", e))),
                }
            }
            .boxed()
            .shared()
        }
        Err(_) => load
            .map(|result| result.map(|set| Some(Arc::new(set))))
            .boxed()
            .shared(),
    }
}

fn skipped_load() -> GrantLoad {
    futures::future::ready(Ok(None)).boxed().shared()
}

async fn load_target(
    finder: Option<Arc<dyn ObjectFinder>>,
    target: Target,
    object_type: &str,
) -> Result<Option<Instance>> {
    match target {
        Target::None => Ok(None),
        Target::Instance(instance) => Ok(Some(instance)),
        Target::Id(id) => match finder {
            Some(finder) => finder.find_by_id(&id).await,
            None => {
                warn!(
                    "No finder registered for object type '{}', target {} treated as absent",
                    object_type, id
                );
                Ok(None)
            }
        },
    }
}
