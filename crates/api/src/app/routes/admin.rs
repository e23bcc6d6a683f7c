//! Admin API for user management and the audit trail.
//!
//! The gate middleware already rejects non-super-admins under `/api/admin`;
//! the account services check the role again before touching the store.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use awap_auth::{AuthError, CreateUserRequest, Role, UserStatus, require_role};
use awap_core::UserId;
use awap_infra::audit::{MAX_RECENT, NewAuditEntry, record_best_effort};

use crate::app::dto::{self, CountResponse, LogsResponse, MessageResponse, StatusBody, UserBody, UsersResponse};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/count", get(count_users))
        .route("/users/:id/toggle-status", post(toggle_status))
        .route("/logs", get(list_logs))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/admin/users - All users, newest first
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    match services.accounts.list_users(session.claims()).await {
        Ok(users) => Json(UsersResponse {
            users: users.iter().map(|u| u.to_public()).collect(),
        })
        .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// POST /api/admin/users - Create a user with any role
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let body = match dto::json_body(payload) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let user = match services.accounts.create_user(session.claims(), body).await {
        Ok(user) => user,
        Err(e) => return errors::auth_error_to_response(e),
    };

    if let Some(actor) = session.claims() {
        record_best_effort(
            services.audit.as_ref(),
            NewAuditEntry::user_created(actor.id, &actor.name, user.id, &user.name, &user.email),
        )
        .await;
    }

    Json(MessageResponse {
        message: "User created successfully".to_string(),
        body: UserBody { user: user.to_public() },
    })
    .into_response()
}

/// GET /api/admin/users/count - Number of registered users
pub async fn count_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    match services.accounts.count_users(session.claims()).await {
        Ok(count) => Json(CountResponse { count }).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// POST /api/admin/users/:id/toggle-status - Enable or disable a user
pub async fn toggle_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Response {
    let id: UserId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::auth_error_to_response(AuthError::from(e)),
    };

    let user = match services.accounts.toggle_status(session.claims(), id).await {
        Ok(user) => user,
        Err(e) => return errors::auth_error_to_response(e),
    };

    if let Some(actor) = session.claims() {
        record_best_effort(
            services.audit.as_ref(),
            NewAuditEntry::status_changed(actor.id, &actor.name, user.id, &user.name, user.status.as_str()),
        )
        .await;
    }

    let verb = match user.status {
        UserStatus::Active => "enabled",
        UserStatus::Disabled => "disabled",
    };
    Json(MessageResponse {
        message: format!("User {verb} successfully"),
        body: StatusBody { status: user.status },
    })
    .into_response()
}

/// GET /api/admin/logs - Most recent audit entries
pub async fn list_logs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Err(e) = require_role(session.claims(), Role::SuperAdmin) {
        return errors::auth_error_to_response(e);
    }

    // An unreadable audit trail shows as empty rather than failing the page.
    let logs = match services.audit.recent(MAX_RECENT).await {
        Ok(logs) => logs,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read audit log");
            Vec::new()
        }
    };
    Json(LogsResponse { logs }).into_response()
}
