use serde::Serialize;

use crate::{AuthError, Role, SessionClaims};

/// Where unauthenticated page requests are sent.
pub const SIGN_IN_PATH: &str = "/auth/signin";

/// Outcome of the authorization gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(String),
    Deny(DenyReason),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
}

impl From<DenyReason> for AuthError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => AuthError::Unauthenticated,
            DenyReason::Forbidden => AuthError::Forbidden,
        }
    }
}

/// How a rule rejects a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Enforcement {
    /// Browser pages: redirect.
    Page,
    /// JSON endpoints: deny with a 401 payload.
    Api,
}

#[derive(Debug, Copy, Clone)]
struct Rule {
    prefix: &'static str,
    required_role: Option<Role>,
    enforcement: Enforcement,
}

// First match wins.
const POLICY: &[Rule] = &[
    Rule {
        prefix: "/api/admin",
        required_role: Some(Role::SuperAdmin),
        enforcement: Enforcement::Api,
    },
    Rule {
        prefix: "/admin",
        required_role: Some(Role::SuperAdmin),
        enforcement: Enforcement::Page,
    },
    Rule {
        prefix: "/dashboard",
        required_role: None,
        enforcement: Enforcement::Page,
    },
];

/// Decide whether a request for `path` may proceed.
///
/// Pure: depends only on the path and the claims carried by the request.
pub fn authorize(path: &str, claims: Option<&SessionClaims>) -> Decision {
    let Some(rule) = POLICY.iter().find(|r| matches_prefix(path, r.prefix)) else {
        return Decision::Allow;
    };

    let Some(claims) = claims else {
        return match rule.enforcement {
            Enforcement::Page => Decision::RedirectTo(SIGN_IN_PATH.to_string()),
            Enforcement::Api => Decision::Deny(DenyReason::Unauthenticated),
        };
    };

    match rule.required_role {
        Some(required) if claims.role != required => match rule.enforcement {
            Enforcement::Page => Decision::RedirectTo(claims.role.default_route().to_string()),
            Enforcement::Api => Decision::Deny(DenyReason::Forbidden),
        },
        _ => Decision::Allow,
    }
}

/// Segment-aware prefix match: `/admin` matches `/admin` and `/admin/x`,
/// never `/administrator`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}

/// Handler-side role check, applied again behind the gate.
pub fn require_role(claims: Option<&SessionClaims>, role: Role) -> Result<&SessionClaims, AuthError> {
    let claims = claims.ok_or(AuthError::Unauthenticated)?;
    if claims.role != role {
        tracing::warn!(user_id = %claims.id, role = %claims.role, required = %role, "role check failed");
        return Err(AuthError::Forbidden);
    }
    Ok(claims)
}
