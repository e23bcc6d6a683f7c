use awap_auth::{AuthError, SessionClaims};

/// Session attached to a request by the session middleware.
///
/// Always present as an extension; `claims` is `None` for anonymous
/// requests and for requests whose token failed verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    claims: Option<SessionClaims>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(claims: SessionClaims) -> Self {
        Self { claims: Some(claims) }
    }

    pub fn claims(&self) -> Option<&SessionClaims> {
        self.claims.as_ref()
    }

    pub fn require(&self) -> Result<&SessionClaims, AuthError> {
        self.claims.as_ref().ok_or(AuthError::Unauthenticated)
    }
}
