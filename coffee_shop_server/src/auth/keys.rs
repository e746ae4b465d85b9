use std::{
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use log::*;
use tokio::sync::RwLock;

use crate::errors::AuthError;

/// A source of token signing keys.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Returns the current signing key set.
    async fn fetch_keys(&self) -> Result<Arc<JwkSet>, AuthError>;

    /// Discards any cached key set. Returns `true` if a cached set was actually dropped, in which case a second call
    /// to [`fetch_keys`](KeyProvider::fetch_keys) may return different keys.
    async fn invalidate(&self) -> bool {
        false
    }
}

//-------------------------------------------  RemoteKeyProvider  ----------------------------------------------------
/// Fetches the key set from the identity provider on every call.
#[derive(Debug, Clone)]
pub struct RemoteKeyProvider {
    url: String,
    client: reqwest::Client,
}

impl RemoteKeyProvider {
    pub fn new(url: &str) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: &str, client: reqwest::Client) -> Self {
        Self { url: url.to_string(), client }
    }
}

#[async_trait]
impl KeyProvider for RemoteKeyProvider {
    async fn fetch_keys(&self) -> Result<Arc<JwkSet>, AuthError> {
        trace!("🔐️ Fetching signing keys from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeySetUnavailable(format!("Request to {} failed. {e}", self.url)))?;
        let keys = response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(format!("{} did not return a valid key set. {e}", self.url)))?;
        debug!("🔐️ Fetched {} signing keys from {}", keys.keys.len(), self.url);
        Ok(Arc::new(keys))
    }
}

//-------------------------------------------  CachedKeyProvider  ----------------------------------------------------
/// Wraps another provider and reuses its key set until `ttl` has passed.
pub struct CachedKeyProvider<P> {
    inner: P,
    ttl: Duration,
    cache: RwLock<Option<(Instant, Arc<JwkSet>)>>,
}

impl<P: Debug> Debug for CachedKeyProvider<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedKeyProvider").field("inner", &self.inner).field("ttl", &self.ttl).finish()
    }
}

impl<P: KeyProvider> CachedKeyProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self { inner, ttl, cache: RwLock::new(None) }
    }
}

#[async_trait]
impl<P: KeyProvider> KeyProvider for CachedKeyProvider<P> {
    async fn fetch_keys(&self) -> Result<Arc<JwkSet>, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some((fetched_at, keys)) = cache.as_ref() {
                if fetched_at.elapsed() < self.ttl {
                    return Ok(Arc::clone(keys));
                }
            }
        }
        let keys = self.inner.fetch_keys().await?;
        *self.cache.write().await = Some((Instant::now(), Arc::clone(&keys)));
        trace!("🔐️ Signing keys cached for {}s", self.ttl.as_secs());
        Ok(keys)
    }

    async fn invalidate(&self) -> bool {
        let dropped = self.cache.write().await.take().is_some();
        if dropped {
            debug!("🔐️ Cached signing keys have been discarded");
        }
        dropped
    }
}

//-------------------------------------------  StaticKeyProvider  ----------------------------------------------------
/// Serves a fixed key set.
#[derive(Debug, Clone)]
pub struct StaticKeyProvider {
    keys: Arc<JwkSet>,
}

impl StaticKeyProvider {
    pub fn new(keys: JwkSet) -> Self {
        Self { keys: Arc::new(keys) }
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    async fn fetch_keys(&self) -> Result<Arc<JwkSet>, AuthError> {
        Ok(Arc::clone(&self.keys))
    }
}
