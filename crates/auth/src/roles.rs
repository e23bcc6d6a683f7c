use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role identifier used for authorization.
///
/// Every role check in the workspace goes through this enum; raw role
/// strings are only accepted at parse boundaries (`FromStr`, serde).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    #[default]
    Hr,
    Manager,
    Lnd,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::Hr, Role::Manager, Role::Lnd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Hr => "hr",
            Role::Manager => "manager",
            Role::Lnd => "lnd",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Hr => "HR Manager",
            Role::Manager => "Department Manager",
            Role::Lnd => "L&D Specialist",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Full system access with user management and system configuration",
            Role::Hr => "View sentiment, training, and workforce analytics",
            Role::Manager => "View team metrics, performance, and reports",
            Role::Lnd => "Manage training programs and view learning analytics",
        }
    }

    /// Landing page after sign-in, and the redirect target when a page
    /// gate rejects this role.
    pub fn default_route(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "/admin",
            _ => "/dashboard",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "super_admin" => Ok(Role::SuperAdmin),
            "hr" => Ok(Role::Hr),
            "manager" => Ok(Role::Manager),
            "lnd" => Ok(Role::Lnd),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
