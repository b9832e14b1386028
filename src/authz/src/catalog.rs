//! Action map and permission catalog
//!
//! The action map records which object types each action applies to. It is
//! derived from the permission catalog by `init()` and rebuilt by `refresh()`.
//! The current snapshot lives behind an `Arc` that is swapped wholesale, so a
//! reader always sees one complete map.

use crate::error::Result;
use crate::store::PermissionCatalogStore;
use crate::types::{ActionType, ObjectType, Permission};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable `action_type -> ordered object types` snapshot
///
/// Actions keep the order in which the catalog first mentions them; object
/// types keep first-seen order per action, duplicates dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMap {
    actions: Vec<(ActionType, Vec<ObjectType>)>,
    index: HashMap<ActionType, usize>,
}

impl ActionMap {
    /// Build a map from a catalog scan
    pub fn from_permissions<'a, I>(permissions: I) -> Self
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        let mut map = Self::default();
        for permission in permissions {
            map.insert(&permission.action_type, &permission.object_type);
        }
        map
    }

    fn insert(&mut self, action_type: &str, object_type: &str) {
        let slot = match self.index.get(action_type) {
            Some(&slot) => slot,
            None => {
                self.actions.push((action_type.to_string(), Vec::new()));
                let slot = self.actions.len() - 1;
                self.index.insert(action_type.to_string(), slot);
                slot
            }
        };

        let object_types = &mut self.actions[slot].1;
        if !object_types.iter().any(|o| o == object_type) {
            object_types.push(object_type.to_string());
        }
    }

    /// Object types for an action, in catalog order
    pub fn object_types(&self, action_type: &str) -> Option<&[ObjectType]> {
        self.index
            .get(action_type)
            .map(|&slot| self.actions[slot].1.as_slice())
    }

    /// Whether the action applies to the object type
    pub fn contains(&self, action_type: &str, object_type: &str) -> bool {
        self.object_types(action_type)
            .is_some_and(|types| types.iter().any(|o| o == object_type))
    }

    /// Action names, in catalog order
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|(action, _)| action.as_str())
    }

    /// `(action, object types)` pairs, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ObjectType])> {
        self.actions
            .iter()
            .map(|(action, types)| (action.as_str(), types.as_slice()))
    }

    /// Number of actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the map has no actions
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Owner of the process-wide action map snapshot
pub struct PermissionCatalog {
    store: Arc<dyn PermissionCatalogStore>,
    current: RwLock<Option<Arc<ActionMap>>>,
}

impl PermissionCatalog {
    /// Create a catalog over a store; no snapshot until `init()`
    pub fn new(store: Arc<dyn PermissionCatalogStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// Load the catalog and install the first snapshot
    pub async fn init(&self) -> Result<()> {
        self.load("init").await
    }

    /// Rebuild the snapshot from the catalog and swap it in
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<()> {
        self.load("refresh").await
    }

    /// Current snapshot, `None` before `init()`
    pub fn snapshot(&self) -> Option<Arc<ActionMap>> {
        self.current.read().clone()
    }

    async fn load(&self, phase: &str) -> Result<()> {
        let permissions = match self.store.find_all().await {
            Ok(permissions) => permissions,
            Err(e) => {
                warn!("Permission catalog {} failed: {}", phase, e);
                return Err(e);
            }
        };

        let map = Arc::new(ActionMap::from_permissions(&permissions));
        debug!("Built action map: {:?}", map.actions().collect::<Vec<_>>());

        info!(
            "Permission catalog {}: {} permissions, {} actions",
            phase,
            permissions.len(),
            map.len()
        );

        *self.current.write() = Some(map);
        Ok(())
    }
}
