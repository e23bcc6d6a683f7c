use serde::{Deserialize, Serialize};

use crate::Role;

/// Capability granted to a role.
///
/// Serialized in camelCase so the names line up with what the dashboard
/// front end checks (`viewSentiment`, `manageUsers`, ...).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    // Administration
    ManageUsers,
    ManageRoles,
    UploadData,
    ViewLogs,
    SystemConfig,
    DatabaseHealth,

    // Analytics
    ViewDashboard,
    ViewSentiment,
    ViewTraining,
    ViewOrgMaturity,
    ViewReports,
    ExportData,
    ViewAllDepartments,

    // Team management
    ViewTeamMetrics,
    ViewDepartmentOnly,
    NotifyHr,
    FlagEmployees,

    // Learning & development
    ManageTraining,
    ViewTrainingAnalytics,
    ViewSkillReadiness,
    ViewTrainingImpact,
    IdentifyTrainingNeeds,
    SendRecommendations,
    GenerateReports,
    CreateLearningPaths,
}

use Permission::*;

const SUPER_ADMIN: &[Permission] = &[
    ManageUsers,
    ManageRoles,
    UploadData,
    ViewLogs,
    SystemConfig,
    DatabaseHealth,
    ViewDashboard,
    ViewSentiment,
    ViewTraining,
    ViewOrgMaturity,
    ViewReports,
    ExportData,
];

const HR: &[Permission] = &[
    ViewDashboard,
    ViewSentiment,
    ViewTraining,
    ViewOrgMaturity,
    ViewReports,
    ExportData,
    ViewAllDepartments,
];

const MANAGER: &[Permission] = &[
    ViewDashboard,
    ViewSentiment,
    ViewTraining,
    ViewReports,
    ViewTeamMetrics,
    ViewDepartmentOnly,
    ExportData,
    NotifyHr,
    FlagEmployees,
];

const LND: &[Permission] = &[
    ViewDashboard,
    ViewTraining,
    ViewReports,
    ManageTraining,
    ViewTrainingAnalytics,
    ExportData,
    ViewSkillReadiness,
    ViewTrainingImpact,
    IdentifyTrainingNeeds,
    SendRecommendations,
    GenerateReports,
    CreateLearningPaths,
];

impl Role {
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::SuperAdmin => SUPER_ADMIN,
            Role::Hr => HR,
            Role::Manager => MANAGER,
            Role::Lnd => LND,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Pages the navigation should offer to this role.
    pub fn accessible_routes(&self) -> Vec<&'static str> {
        let mut routes = Vec::new();

        if self.has_permission(ViewDashboard) {
            routes.push("/dashboard");
        }
        if self.has_permission(ViewSentiment) {
            routes.push("/dashboard/sentiment");
        }
        if self.has_permission(ViewTraining) {
            routes.push("/dashboard/training");
        }
        if self.has_permission(ViewOrgMaturity) {
            routes.push("/dashboard/org");
        }
        if self.has_permission(ViewReports) {
            routes.push("/dashboard/reports");
        }

        match self {
            Role::Manager => routes.extend([
                "/dashboard/team",
                "/dashboard/team/sentiment",
                "/dashboard/team/productivity",
                "/dashboard/team/training",
            ]),
            Role::Lnd => routes.extend([
                "/dashboard/lnd",
                "/dashboard/lnd/skill-readiness",
                "/dashboard/lnd/training-impact",
                "/dashboard/lnd/training-needs",
                "/dashboard/lnd/recommendations",
            ]),
            Role::SuperAdmin => routes.extend([
                "/admin",
                "/admin/users",
                "/admin/data",
                "/admin/logs",
                "/admin/settings",
            ]),
            Role::Hr => {}
        }

        routes
    }
}
