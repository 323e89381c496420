//! Role to action permission matrix.
//!
//! The matrix is built once at startup from [`AccessConfig`] and only read
//! afterwards. Lookups are total: an unknown role, or a method that maps to no
//! [`Action`], is simply not allowed.

use std::collections::{HashMap, HashSet};
use std::fmt;

use axum::http::Method;

use dashboard_config::{AccessConfig, ConfigError, RoleGrant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Get,
    Post,
    Put,
    Delete,
}

impl Action {
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::POST => Some(Self::Post),
            Method::PUT => Some(Self::Put),
            Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMatrix {
    grants: HashMap<String, HashSet<Action>>,
}

impl PermissionMatrix {
    /// Builds the matrix, rejecting verbs outside [`Action`].
    pub fn from_grants(grants: &[RoleGrant]) -> Result<Self, ConfigError> {
        let mut matrix = Self::default();
        for grant in grants {
            let actions = matrix.grants.entry(grant.role.clone()).or_default();
            for verb in &grant.verbs {
                let action = Action::parse(verb).ok_or_else(|| ConfigError::Invalid {
                    variable: "DASHBOARD_PERMISSIONS",
                    reason: format!("unknown verb '{verb}' for role '{}'", grant.role),
                })?;
                actions.insert(action);
            }
        }
        Ok(matrix)
    }

    pub fn from_config(config: &AccessConfig) -> Result<Self, ConfigError> {
        Self::from_grants(&config.grants)
    }

    pub fn is_allowed(&self, role: &str, action: Action) -> bool {
        self.grants
            .get(role)
            .is_some_and(|actions| actions.contains(&action))
    }

    pub fn is_method_allowed(&self, role: &str, method: &Method) -> bool {
        Action::from_method(method).is_some_and(|action| self.is_allowed(role, action))
    }
}
