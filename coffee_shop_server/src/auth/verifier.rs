use std::{fmt::Debug, sync::Arc};

use jsonwebtoken::{
    decode,
    decode_header,
    errors::{Error as JwtError, ErrorKind},
    jwk::Jwk,
    Algorithm,
    DecodingKey,
    Validation,
};
use log::*;

use crate::{
    auth::{
        claims::{ClaimSet, TokenClaims},
        CachedKeyProvider,
        KeyProvider,
        RemoteKeyProvider,
    },
    config::AuthConfig,
    errors::AuthError,
};

/// Checks bearer tokens against the identity provider's signing keys and the configured audience and issuer.
///
/// A single verifier is shared by all server workers.
pub struct TokenVerifier {
    audience: String,
    issuer: String,
    algorithms: Vec<Algorithm>,
    keys: Arc<dyn KeyProvider>,
}

impl Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("algorithms", &self.algorithms)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig, keys: Arc<dyn KeyProvider>) -> Self {
        Self { audience: config.audience.clone(), issuer: config.issuer(), algorithms: config.algorithms.clone(), keys }
    }

    /// Creates a verifier that fetches its keys from `config.jwks_url`, caching them if a non-zero TTL is configured.
    pub fn from_config(config: &AuthConfig) -> Self {
        let remote = RemoteKeyProvider::new(&config.jwks_url);
        let keys: Arc<dyn KeyProvider> = if config.jwks_cache_ttl.is_zero() {
            Arc::new(remote)
        } else {
            info!("🔐️ Signing keys will be cached for {}s", config.jwks_cache_ttl.as_secs());
            Arc::new(CachedKeyProvider::new(remote, config.jwks_cache_ttl))
        };
        Self::new(config, keys)
    }

    pub async fn verify(&self, token: &str) -> Result<ClaimSet, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let header = decode_header(token).map_err(|e| {
            debug!("🔐️ Could not decode token header. {e}");
            AuthError::InvalidHeader("Malformed header".into())
        })?;
        let kid = header.kid.as_deref().ok_or_else(|| AuthError::InvalidHeader("Token header has no kid".into()))?;
        if !self.algorithms.contains(&header.alg) {
            return Err(AuthError::InvalidHeader(format!("{:?} is not an accepted signing algorithm", header.alg)));
        }
        let jwk = self.find_key(kid).await?;
        let key = DecodingKey::from_jwk(&jwk)
            .map_err(|e| AuthError::InvalidHeader(format!("Signing key {kid} cannot be used. {e}")))?;
        let mut validation = Validation::new(header.alg);
        validation.leeway = 0;
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        let data = decode::<TokenClaims>(token, &key, &validation).map_err(claims_error)?;
        let claims = ClaimSet::try_from_token_claims(data.claims)?;
        trace!("🔐️ Token for {} has been verified", claims.subject());
        Ok(claims)
    }

    async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        let keys = self.keys.fetch_keys().await?;
        if let Some(jwk) = keys.find(kid) {
            return Ok(jwk.clone());
        }
        if self.keys.invalidate().await {
            debug!("🔐️ Key {kid} is not in the cached key set. Fetching the key set again.");
            let keys = self.keys.fetch_keys().await?;
            if let Some(jwk) = keys.find(kid) {
                return Ok(jwk.clone());
            }
        }
        debug!("🔐️ No signing key with kid {kid} was found");
        Err(AuthError::InvalidHeader("Unable to find the appropriate key".into()))
    }
}

fn claims_error(e: JwtError) -> AuthError {
    let msg = match e.kind() {
        ErrorKind::ExpiredSignature => "Token expired".to_string(),
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
            "Incorrect claims. Please check the audience and issuer.".to_string()
        },
        _ => format!("Unable to parse authentication token. {e}"),
    };
    AuthError::InvalidClaims(msg)
}
