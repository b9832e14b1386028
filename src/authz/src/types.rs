//! Core authorization types

use crate::scope::Scope;
use serde::{Deserialize, Serialize};

/// Unique permission identifier
pub type PermissionId = String;

/// Unique role identifier
pub type RoleId = String;

/// Action name (e.g. "edit", "browse")
pub type ActionType = String;

/// Object type name (e.g. "post", "user")
pub type ObjectType = String;

/// A loaded object instance checked by scope predicates
pub type Instance = serde_json::Value;

/// Catalog entry describing one action on one object type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Unique permission identifier
    pub id: PermissionId,

    /// Human readable name (e.g. "Edit posts")
    pub name: String,

    /// Object type the permission applies to
    pub object_type: ObjectType,

    /// Action the permission allows
    pub action_type: ActionType,
}

impl Permission {
    /// Create a new permission
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        action_type: impl Into<String>,
        object_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            object_type: object_type.into(),
            action_type: action_type.into(),
        }
    }
}

/// A permission attached to a role or principal, narrowed by a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Granted permission
    pub permission: Permission,

    /// Scope qualifier
    #[serde(default)]
    pub scope: Scope,

    /// Dotted field paths read off the target (`related`, `me`)
    #[serde(default)]
    pub fields: Vec<String>,

    /// Expected values, index-aligned with `fields` (`related`)
    #[serde(default)]
    pub values: Vec<String>,
}

impl PermissionGrant {
    /// Unconditional grant
    pub fn all(permission: Permission) -> Self {
        Self {
            permission,
            scope: Scope::All,
            fields: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Grant limited to targets whose `field` equals the actor id
    pub fn me(permission: Permission, field: impl Into<String>) -> Self {
        Self {
            permission,
            scope: Scope::Me,
            fields: vec![field.into()],
            values: Vec::new(),
        }
    }

    /// Grant limited to targets whose fields all equal the given values
    pub fn related<F, V>(permission: Permission, fields: F, values: V) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            permission,
            scope: Scope::Related,
            fields: fields.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Named bundle of grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier
    pub id: RoleId,

    /// Role name (e.g. "Editor")
    pub name: String,

    /// Grants carried by the role
    #[serde(default)]
    pub grants: Vec<PermissionGrant>,
}

impl Role {
    /// Create a role without grants
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grants: Vec::new(),
        }
    }

    /// Add a grant to the role
    pub fn with_grant(mut self, grant: PermissionGrant) -> Self {
        self.grants.push(grant);
        self
    }
}

/// User principal: holds roles and direct grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,

    /// Held roles, in assignment order
    #[serde(default)]
    pub roles: Vec<RoleId>,

    /// Direct grants
    #[serde(default)]
    pub grants: Vec<PermissionGrant>,
}

impl User {
    /// Create a user without roles or grants
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
            grants: Vec::new(),
        }
    }

    /// Assign a role
    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.roles.push(role_id.into());
        self
    }

    /// Add a direct grant
    pub fn with_grant(mut self, grant: PermissionGrant) -> Self {
        self.grants.push(grant);
        self
    }
}

/// Application principal: direct grants only, never roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    /// Unique app identifier
    pub id: String,

    /// Direct grants
    #[serde(default)]
    pub grants: Vec<PermissionGrant>,
}

impl App {
    /// Create an app without grants
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            grants: Vec::new(),
        }
    }

    /// Add a direct grant
    pub fn with_grant(mut self, grant: PermissionGrant) -> Self {
        self.grants.push(grant);
        self
    }
}

/// Calling context a query is bound to
///
/// Deserializes from the context object the API layer passes along, e.g.
/// `{"internal": true}` or `{"user": "1", "app": "7"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Trusted internal caller; bypasses every check
    #[serde(default)]
    pub internal: bool,

    /// Acting user
    #[serde(default, rename = "user", alias = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Acting application
    #[serde(default, rename = "app", alias = "app_id", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl AuthContext {
    /// Trusted internal context
    pub fn internal() -> Self {
        Self {
            internal: true,
            ..Default::default()
        }
    }

    /// Anonymous (public) context
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context acting as a user
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Context acting as an app
    pub fn app(app_id: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            ..Default::default()
        }
    }

    /// Restrict the context to an app
    pub fn with_app(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// No internal flag, no user and no app
    pub fn is_anonymous(&self) -> bool {
        !self.internal && self.user_id.is_none() && self.app_id.is_none()
    }
}

/// What an evaluator is asked about: nothing, a raw id, or a loaded instance
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Target {
    /// No target
    #[default]
    None,
    /// Raw identifier, loaded through the object type's finder
    Id(String),
    /// Already-loaded instance
    Instance(Instance),
}

impl Target {
    /// Raw identifier target
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }
}

impl From<Instance> for Target {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl From<Option<Instance>> for Target {
    fn from(instance: Option<Instance>) -> Self {
        instance.map_or(Self::None, Self::Instance)
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}
