use std::collections::HashSet;

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use futures::future::{ready, Ready};
use log::*;
use serde::Deserialize;

use crate::errors::{AuthError, ServerError};

/// The claims carried by a verified access token.
///
/// A `ClaimSet` can only be obtained from [`TokenVerifier::verify`](crate::auth::TokenVerifier::verify), so holding
/// one means that the token's signature, expiry, audience and issuer have all been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    subject: String,
    permissions: Option<HashSet<String>>,
    expiry: DateTime<Utc>,
}

/// The token payload fields we care about, as they appear on the wire.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenClaims {
    sub: String,
    exp: i64,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

impl ClaimSet {
    pub(crate) fn try_from_token_claims(claims: TokenClaims) -> Result<Self, AuthError> {
        let expiry = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::InvalidClaims(format!("Expiry time {} is out of range", claims.exp)))?;
        let permissions = claims.permissions.map(|p| p.into_iter().collect());
        Ok(Self { subject: claims.sub, permissions, expiry })
    }

    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// The permissions granted to the token holder. `None` if the token did not have a `permissions` claim at all.
    pub fn permissions(&self) -> Option<&HashSet<String>> {
        self.permissions.as_ref()
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.as_ref().map(|p| p.contains(permission)).unwrap_or(false)
    }
}

/// Checks that `claims` grant the `required` permission. This is a plain membership test.
///
/// An empty `required` string means that no permission is needed.
pub fn check_permission(claims: &ClaimSet, required: &str) -> Result<(), AuthError> {
    if required.is_empty() {
        return Ok(());
    }
    match claims.permissions() {
        None => Err(AuthError::InvalidClaims("Permissions not included in JWT.".into())),
        Some(permissions) if permissions.contains(required) => Ok(()),
        Some(_) => Err(AuthError::Unauthorized(format!("{} does not hold {required}", claims.subject()))),
    }
}

/// Handlers behind the authorization middleware can take a `ClaimSet` argument to receive the verified claims.
impl FromRequest for ClaimSet {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<ClaimSet>().cloned().ok_or_else(|| {
            warn!("🔐️ No verified claims found in request extensions. Is the route missing its ACL middleware?");
            ServerError::AuthenticationError(AuthError::AuthHeaderMissing)
        });
        ready(claims)
    }
}
