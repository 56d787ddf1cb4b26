use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller role. Only admins may apply imports or run administrative mutations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Operator => "OPERATOR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "OPERATOR" | "OPERADOR" => Some(Role::Operator),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unauthorized {
    pub role: Role,
    pub action: &'static str,
}

impl fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "role {} is not allowed to {}; admin required",
            self.role.as_str(),
            self.action
        )
    }
}

impl std::error::Error for Unauthorized {}

pub fn require_admin(role: Role, action: &'static str) -> Result<(), Unauthorized> {
    match role {
        Role::Admin => Ok(()),
        Role::Operator => Err(Unauthorized { role, action }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_passes() {
        assert!(require_admin(Role::Admin, "apply import").is_ok());
        let err = require_admin(Role::Operator, "apply import").unwrap_err();
        assert_eq!(
            err.to_string(),
            "role OPERATOR is not allowed to apply import; admin required"
        );
        assert_eq!(Role::parse("operador"), Some(Role::Operator));
    }
}
