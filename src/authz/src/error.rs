//! Error types for the authorization engine

use crate::scope::ScopeError;
use thiserror::Error;

/// Authorization engine errors
///
/// Errors are `Clone` because a single permission load is shared by every
/// evaluator of a query, and each of them receives the same failure.
#[derive(Debug, Clone, Error)]
pub enum AuthzError {
    /// Engine used before the action map was loaded
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Scope literal outside `all`, `related`, `me`
    #[error("Invalid scope: {0}")]
    InvalidScope(#[from] ScopeError),

    /// Referenced principal does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic denial; never says which check failed
    #[error("You do not have permission to perform this action")]
    NoPermission,

    /// Action/object type pair absent from the current action map
    #[error("No capability registered for action '{action_type}'{}", on_object_type(.object_type))]
    UnknownCapability {
        /// Requested action
        action_type: String,
        /// Requested object type; `None` when the action itself is unknown
        object_type: Option<String>,
    },

    /// Collaborator store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn on_object_type(object_type: &Option<String>) -> String {
    match object_type {
        Some(object_type) => format!(" on '{}'", object_type),
        None => String::new(),
    }
}

impl AuthzError {
    /// Whether this error is the undifferentiated denial outcome
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::NoPermission)
    }
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_capability_message() {
        let pair = AuthzError::UnknownCapability {
            action_type: "edit".to_string(),
            object_type: Some("post".to_string()),
        };
        assert_eq!(pair.to_string(), "No capability registered for action 'edit' on 'post'");

        let action_only = AuthzError::UnknownCapability {
            action_type: "publish".to_string(),
            object_type: None,
        };
        assert_eq!(action_only.to_string(), "No capability registered for action 'publish'");
        assert!(!action_only.is_denial());
    }
}
