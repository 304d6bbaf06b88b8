//! Role Model
//!
//! 封闭的角色枚举（RBAC）。授权判断全部用穷举 match，
//! 不做字符串比较。

use serde::{Deserialize, Serialize};

/// Actor role.
///
/// Wire representation: `customer`, `admin`, `admin_master`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Admin,
    AdminMaster,
}

impl Role {
    /// Whether this role carries store-side administrative rights.
    pub fn is_admin(&self) -> bool {
        match self {
            Role::Admin | Role::AdminMaster => true,
            Role::Customer => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
            Role::AdminMaster => "admin_master",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            "admin_master" => Ok(Role::AdminMaster),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Returned when a token carries a role outside the closed set.
#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_wire_names() {
        for role in [Role::Customer, Role::Admin, Role::AdminMaster] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn admin_master_serializes_with_underscore() {
        assert_eq!(
            serde_json::to_string(&Role::AdminMaster).unwrap(),
            "\"admin_master\""
        );
    }

    #[test]
    fn unknown_role_rejected() {
        assert!("superuser".parse::<Role>().is_err());
    }
}
