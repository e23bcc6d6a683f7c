//! Sign-in, sign-out, self-registration and session introspection.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use awap_auth::SignupRequest;

use crate::app::dto::{self, LoginRequest, LoginResponse, MessageResponse, SessionView, UserBody};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;
use crate::middleware::SESSION_COOKIE;

/// POST /api/auth/login - Exchange credentials for a session
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let body = match dto::json_body(payload) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    match services.authenticator.authenticate(&email, &password).await {
        Ok(session) => {
            let cookie = Cookie::build((SESSION_COOKIE, session.token.clone()))
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(services.secure_cookies)
                .path("/");

            let response = LoginResponse {
                user: session.user.to_public(),
                token: session.token,
                expires_at: session.expires_at,
                redirect_to: session.claims.role.default_route(),
            };
            (jar.add(cookie), Json(response)).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// POST /api/auth/logout - Drop the session cookie
///
/// Tokens are stateless; an already-copied token stays valid until it expires.
pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(serde_json::json!({ "message": "Signed out" }))).into_response()
}

/// POST /api/auth/signup - Self-register a non-admin account
pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Response {
    let body = match dto::json_body(payload) {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match services.accounts.signup(body).await {
        Ok(user) => Json(MessageResponse {
            message: "User created successfully".to_string(),
            body: UserBody { user: user.to_public() },
        })
        .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// GET /api/auth/session - Claims plus role presentation for the current session
pub async fn session(Extension(session): Extension<SessionContext>) -> Response {
    match session.require() {
        Ok(claims) => Json(SessionView::from_claims(claims)).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
