use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use awap_auth::AuthError;

/// Map an auth-layer failure onto a status code and a stable error code.
///
/// Messages come from `AuthError`'s `Display`, which never carries store or
/// hashing detail.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    let (status, code) = match &err {
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "authentication_failed"),
        AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
        AuthError::Forbidden => (StatusCode::UNAUTHORIZED, "unauthorized"),
        AuthError::MissingCredentials => (StatusCode::BAD_REQUEST, "missing_credentials"),
        AuthError::WeakPassword => (StatusCode::BAD_REQUEST, "weak_password"),
        AuthError::DuplicateAccount => (StatusCode::BAD_REQUEST, "duplicate_account"),
        AuthError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        AuthError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        AuthError::UpstreamUnavailable | AuthError::Internal => {
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "something went wrong, please try again",
            );
        }
    };
    json_error(status, code, err.to_string())
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
