use std::{env, str::FromStr, time::Duration};

use jsonwebtoken::Algorithm;
use log::*;

use crate::errors::ServerError;

const DEFAULT_DRINKS_HOST: &str = "127.0.0.1";
const DEFAULT_DRINKS_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://drinks.db";
const DEFAULT_JWT_ALGORITHMS: [Algorithm; 1] = [Algorithm::RS256];
const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(0);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, the database is dropped and recreated on startup. **All data will be lost.**
    pub reset_database: bool,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DRINKS_HOST.to_string(),
            port: DEFAULT_DRINKS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            reset_database: false,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("DRINKS_HOST").ok().unwrap_or_else(|| DEFAULT_DRINKS_HOST.into());
        let port = env::var("DRINKS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DRINKS_PORT. {e} Using the default, {DEFAULT_DRINKS_PORT}, \
                         instead."
                    );
                    DEFAULT_DRINKS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DRINKS_PORT);
        let database_url = env::var("DRINKS_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ DRINKS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let reset_database = env::var("DRINKS_RESET_DB").map(|s| &s == "1" || &s == "true").unwrap_or(false);
        if reset_database {
            warn!("🚨️ DRINKS_RESET_DB is set. The database will be dropped and recreated on startup. 🚨️");
        }
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            error!(
                "🪛️ Could not load the authorization configuration from environment variables. {e}. Every request \
                 to a protected endpoint will be rejected."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, reset_database, auth }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The identity provider's domain, e.g. `my-tenant.eu.auth0.com`. Tokens must have been issued by
    /// `https://{domain}/`.
    pub domain: String,
    /// The API identifier. Tokens must carry it in their `aud` claim.
    pub audience: String,
    /// The token signing algorithms that will be accepted.
    pub algorithms: Vec<Algorithm>,
    /// Where the identity provider publishes its signing keys.
    pub jwks_url: String,
    /// How long a fetched key set is reused. Zero means that the keys are fetched for every request.
    pub jwks_cache_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: String::default(),
            audience: String::default(),
            algorithms: DEFAULT_JWT_ALGORITHMS.to_vec(),
            jwks_url: String::default(),
            jwks_cache_ttl: DEFAULT_JWKS_CACHE_TTL,
        }
    }
}

impl AuthConfig {
    pub fn new(domain: &str, audience: &str) -> Self {
        let domain = normalize_domain(domain);
        let jwks_url = default_jwks_url(&domain);
        Self { domain, audience: audience.to_string(), jwks_url, ..Default::default() }
    }

    /// The expected value of the `iss` claim.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let domain = env::var("DRINKS_AUTH_DOMAIN")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [DRINKS_AUTH_DOMAIN]")))?;
        let audience = env::var("DRINKS_API_AUDIENCE")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [DRINKS_API_AUDIENCE]")))?;
        let mut config = Self::new(&domain, &audience);
        if let Ok(s) = env::var("DRINKS_JWT_ALGORITHMS") {
            config.algorithms = parse_algorithms(&s);
        }
        if let Ok(url) = env::var("DRINKS_JWKS_URL") {
            config.jwks_url = url;
        }
        config.jwks_cache_ttl = env::var("DRINKS_JWKS_CACHE_TTL")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for DRINKS_JWKS_CACHE_TTL. {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_JWKS_CACHE_TTL);
        info!(
            "🪛️ Accepting {:?} tokens issued by {} for {}. Signing keys are fetched from {}",
            config.algorithms,
            config.issuer(),
            config.audience,
            config.jwks_url
        );
        Ok(config)
    }
}

/// Strips any scheme and trailing slashes from the identity provider domain.
fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    let domain = domain.strip_prefix("https://").or_else(|| domain.strip_prefix("http://")).unwrap_or(domain);
    domain.trim_end_matches('/').to_string()
}

fn default_jwks_url(domain: &str) -> String {
    format!("https://{domain}/.well-known/jwks.json")
}

fn parse_algorithms(s: &str) -> Vec<Algorithm> {
    let algorithms = s
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            Algorithm::from_str(s)
                .map_err(|e| warn!("🪛️ Ignoring unknown algorithm ({s}) in DRINKS_JWT_ALGORITHMS: {e}"))
                .ok()
        })
        .collect::<Vec<_>>();
    if algorithms.is_empty() {
        warn!("🪛️ DRINKS_JWT_ALGORITHMS does not list any valid algorithms. Using the default, RS256.");
        DEFAULT_JWT_ALGORITHMS.to_vec()
    } else {
        algorithms
    }
}
