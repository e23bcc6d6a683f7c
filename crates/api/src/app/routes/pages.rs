//! Page endpoints. The gate middleware has already redirected anyone who
//! may not see them; handlers only shape the payload.

use axum::{
    Json,
    extract::Extension,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};

use awap_auth::{Role, SIGN_IN_PATH, require_role};

use crate::app::dto::{PageResponse, SessionView};
use crate::context::SessionContext;

/// GET /auth/signin - Sign-in page; signed-in users go to their landing page
pub async fn signin(Extension(session): Extension<SessionContext>) -> Response {
    if let Some(claims) = session.claims() {
        return Redirect::temporary(claims.role.default_route()).into_response();
    }
    Json(serde_json::json!({
        "page": "signin",
        "login_endpoint": "/api/auth/login",
        "signup_endpoint": "/api/auth/signup",
    }))
    .into_response()
}

/// GET /dashboard[/*] - Role dashboard shell
pub async fn dashboard(Extension(session): Extension<SessionContext>, uri: Uri) -> Response {
    let Some(claims) = session.claims() else {
        return Redirect::temporary(SIGN_IN_PATH).into_response();
    };
    Json(PageResponse {
        page: "dashboard",
        path: uri.path().to_string(),
        session: SessionView::from_claims(claims),
    })
    .into_response()
}

/// GET /admin[/*] - Administration shell
pub async fn admin(Extension(session): Extension<SessionContext>, uri: Uri) -> Response {
    let claims = match require_role(session.claims(), Role::SuperAdmin) {
        Ok(claims) => claims,
        Err(_) => {
            let target = session
                .claims()
                .map(|c| c.role.default_route())
                .unwrap_or(SIGN_IN_PATH);
            return Redirect::temporary(target).into_response();
        }
    };
    Json(PageResponse {
        page: "admin",
        path: uri.path().to_string(),
        session: SessionView::from_claims(claims),
    })
    .into_response()
}
