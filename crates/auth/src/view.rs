//! Role → dashboard presentation mapping.

use serde::Serialize;

use crate::Role;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleIcon {
    Shield,
    Users,
    BarChart,
    GraduationCap,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Red,
    Blue,
    Green,
    Purple,
}

/// Header configuration the dashboard renders for a role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct RoleView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub icon: RoleIcon,
    pub color: ColorScheme,
}

const SUPER_ADMIN_VIEW: RoleView = RoleView {
    title: "System Administration",
    subtitle: "Manage users, data, and system configuration",
    icon: RoleIcon::Shield,
    color: ColorScheme::Red,
};

const HR_VIEW: RoleView = RoleView {
    title: "HR Analytics Dashboard",
    subtitle: "Workforce sentiment and training insights",
    icon: RoleIcon::Users,
    color: ColorScheme::Blue,
};

const MANAGER_VIEW: RoleView = RoleView {
    title: "Team Performance Dashboard",
    subtitle: "Track your team's productivity and adoption",
    icon: RoleIcon::BarChart,
    color: ColorScheme::Green,
};

const LND_VIEW: RoleView = RoleView {
    title: "Learning & Development Dashboard",
    subtitle: "Training effectiveness and skill development",
    icon: RoleIcon::GraduationCap,
    color: ColorScheme::Purple,
};

impl RoleView {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::SuperAdmin => SUPER_ADMIN_VIEW,
            Role::Hr => HR_VIEW,
            Role::Manager => MANAGER_VIEW,
            Role::Lnd => LND_VIEW,
        }
    }

    /// Unrecognized names get the `hr` configuration.
    pub fn for_role_name(name: &str) -> Self {
        name.parse::<Role>()
            .map(Self::for_role)
            .unwrap_or(HR_VIEW)
    }
}
