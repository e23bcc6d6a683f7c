use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use awap_auth::{Decision, DenyReason, SessionReader, authorize};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "awap.session-token";

/// Attach a [`SessionContext`] to every request.
///
/// The session cookie is tried first, then an `Authorization: Bearer`
/// header. A bad token is treated as no session.
pub async fn session_middleware(
    State(services): State<Arc<AppServices>>,
    jar: CookieJar,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let context = resolve_session(
        &services.sessions,
        jar.get(SESSION_COOKIE).map(|c| c.value()),
        extract_bearer(req.headers()),
    );
    if context.claims().is_none() {
        tracing::trace!(path = %req.uri().path(), "anonymous request");
    }

    req.extensions_mut().insert(context);
    next.run(req).await
}

/// First token that verifies wins; a stale cookie does not hide a valid
/// bearer token.
fn resolve_session(reader: &SessionReader, cookie: Option<&str>, bearer: Option<&str>) -> SessionContext {
    for (source, token) in [("cookie", cookie), ("bearer", bearer)] {
        let Some(token) = token else { continue };
        match reader.read(token) {
            Ok(claims) => return SessionContext::authenticated(claims),
            Err(_) => tracing::debug!(source, "ignoring invalid session token"),
        }
    }
    SessionContext::anonymous()
}

/// Apply the authorization policy to the request path.
pub async fn gate_middleware(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let decision = {
        let claims = req.extensions().get::<SessionContext>().and_then(|s| s.claims());
        authorize(&path, claims)
    };

    match decision {
        Decision::Allow => next.run(req).await,
        Decision::RedirectTo(target) => {
            tracing::debug!(path = %path, target = %target, "redirecting gated page");
            Redirect::temporary(&target).into_response()
        }
        Decision::Deny(reason) => {
            tracing::info!(path = %path, reason = ?reason, "denied gated api request");
            let message = match reason {
                DenyReason::Unauthenticated => "authentication required",
                DenyReason::Forbidden => "super admin role required",
            };
            errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
