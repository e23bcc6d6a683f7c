use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use awap_auth::{Permission, PublicUser, Role, RoleView, SessionClaims, UserStatus};
use awap_infra::AuditEntry;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Unwrap a JSON body, turning axum's rejection into our error shape.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            rejection.body_text(),
        )),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: PublicUser,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub redirect_to: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: String,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: UserStatus,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<PublicUser>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<AuditEntry>,
}

/// Everything the dashboard shell needs to render for the signed-in user.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: SessionClaims,
    pub role_name: &'static str,
    pub role_description: &'static str,
    pub view: RoleView,
    pub permissions: &'static [Permission],
    pub accessible_routes: Vec<&'static str>,
    pub default_route: &'static str,
}

impl SessionView {
    pub fn from_claims(claims: &SessionClaims) -> Self {
        let role: Role = claims.role;
        Self {
            user: claims.clone(),
            role_name: role.display_name(),
            role_description: role.description(),
            view: RoleView::for_role(role),
            permissions: role.permissions(),
            accessible_routes: role.accessible_routes(),
            default_route: role.default_route(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub page: &'static str,
    pub path: String,
    #[serde(flatten)]
    pub session: SessionView,
}
