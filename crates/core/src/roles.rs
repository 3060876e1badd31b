//! Well-known role tags.
//!
//! The tags are persisted in the `role_grants` table and must stay stable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_SUPER_ADMIN: &str = "DEFAULT_ADMIN_ROLE";
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_PAUSER: &str = "PAUSER";

/// A named capability grantable to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May grant roles and swap the logic revision.
    #[serde(rename = "DEFAULT_ADMIN_ROLE")]
    SuperAdmin,
    /// Management of projects and milestones.
    #[serde(rename = "ADMIN")]
    Admin,
    /// Toggles the global pause flag.
    #[serde(rename = "PAUSER")]
    Pauser,
}

impl Role {
    /// Roles granted to the initializing caller, in grant order.
    pub const ALL: [Role; 3] = [Role::SuperAdmin, Role::Admin, Role::Pauser];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
            Role::Admin => ROLE_ADMIN,
            Role::Pauser => ROLE_PAUSER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            ROLE_SUPER_ADMIN => Ok(Role::SuperAdmin),
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_PAUSER => Ok(Role::Pauser),
            other => Err(format!(
                "Unknown role '{other}'. Must be one of: {ROLE_SUPER_ADMIN}, {ROLE_ADMIN}, {ROLE_PAUSER}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back_to_roles() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "OWNER".parse::<Role>().unwrap_err();
        assert!(err.contains("OWNER"));
    }

    #[test]
    fn serde_uses_the_persisted_tags() {
        assert_eq!(serde_json::to_string(&Role::Pauser).unwrap(), "\"PAUSER\"");
        let role: Role = serde_json::from_str("\"DEFAULT_ADMIN_ROLE\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
    }
}
