/// Scope type definitions and parsing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for scope operations
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Errors that can occur while parsing a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// Scope literal outside the known set
    Unknown(String),
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(raw) => write!(
                f,
                "'{}' is not a valid scope, expected one of: all, related, me",
                raw
            ),
        }
    }
}

impl std::error::Error for ScopeError {}

/// Qualifier narrowing where a grant applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Unconditional
    #[default]
    All,
    /// Multi-field equality against the target
    Related,
    /// Single-field equality against the acting user's id
    Me,
}

impl Scope {
    /// All known scopes
    pub const ALL: [Scope; 3] = [Scope::All, Scope::Related, Scope::Me];

    /// Parses an optional scope literal
    ///
    /// `None` and the empty string both mean "not given"; callers pick the
    /// default.
    pub fn parse_optional(raw: Option<&str>) -> ScopeResult<Option<Self>> {
        match raw {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }

    /// Literal form of the scope
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Related => "related",
            Self::Me => "me",
        }
    }
}

impl FromStr for Scope {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "related" => Ok(Self::Related),
            "me" => Ok(Self::Me),
            other => Err(ScopeError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
