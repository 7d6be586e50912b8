//! Identity provider key set (JWKS) retrieval and caching.
//!
//! - [`KeySource`] is the seam the validator depends on.
//! - [`RemoteJwks`] discovers `jwks_uri` from the issuer's OpenID configuration,
//!   fetches the key set and keeps it for a fixed TTL.
//! - A plain [`JwkSet`] is also a `KeySource` (fixed keys, no network).

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use url::Url;

pub const OIDC_CONFIGURATION_ENDPOINT: &str = ".well-known/openid-configuration";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: Url, status: u16 },

    #[error("could not parse response from {url}: {source}")]
    Parse {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot derive openid configuration url from issuer {issuer}: {source}")]
    InvalidIssuer {
        issuer: Url,
        #[source]
        source: url::ParseError,
    },

    #[error("openid configuration at {url} has no jwks_uri")]
    MissingJwksUri { url: Url },

    #[error("invalid jwks_uri in openid configuration: {0}")]
    InvalidJwksUri(String),
}

/// Supplies the public keys tokens are verified against.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn jwk_set(&self) -> Result<Arc<JwkSet>, JwksError>;
}

#[async_trait]
impl KeySource for JwkSet {
    async fn jwk_set(&self) -> Result<Arc<JwkSet>, JwksError> {
        Ok(Arc::new(self.clone()))
    }
}

/// Only the field we need from `.well-known/openid-configuration`.
#[derive(Debug, Deserialize)]
struct OpenIdConfiguration {
    #[serde(default)]
    jwks_uri: Option<String>,
}

struct CachedJwks {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Remote JWKS with a fixed time-to-live.
///
/// Readers share the cached set. When it expires the next reader refreshes it;
/// concurrent readers wait on the same refresh instead of fetching again.
/// Failed fetches are not cached.
pub struct RemoteJwks {
    http_client: reqwest::Client,
    issuer: Url,
    jwks_uri: RwLock<Option<Url>>,
    ttl: Duration,
    cache: RwLock<Option<CachedJwks>>,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for RemoteJwks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteJwks")
            .field("issuer", &self.issuer.as_str())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl RemoteJwks {
    /// `jwks_uri` skips discovery when given.
    pub fn new(issuer: Url, jwks_uri: Option<Url>, ttl: Duration) -> Result<Self, JwksError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(JwksError::Client)?;

        Ok(Self {
            http_client,
            issuer,
            jwks_uri: RwLock::new(jwks_uri),
            ttl,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    async fn cached(&self) -> Option<Arc<JwkSet>> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| Arc::clone(&cached.keys))
    }

    async fn resolve_jwks_uri(&self) -> Result<Url, JwksError> {
        if let Some(uri) = self.jwks_uri.read().await.as_ref() {
            return Ok(uri.clone());
        }

        let configuration_url = self
            .issuer
            .join(OIDC_CONFIGURATION_ENDPOINT)
            .map_err(|source| JwksError::InvalidIssuer {
                issuer: self.issuer.clone(),
                source,
            })?;

        let configuration: OpenIdConfiguration = self.get_json(configuration_url.clone()).await?;
        let jwks_uri = configuration
            .jwks_uri
            .ok_or(JwksError::MissingJwksUri {
                url: configuration_url,
            })?;
        let uri = Url::parse(&jwks_uri).map_err(|_| JwksError::InvalidJwksUri(jwks_uri))?;

        tracing::debug!(jwks_uri = %uri, "discovered jwks_uri");
        *self.jwks_uri.write().await = Some(uri.clone());
        Ok(uri)
    }

    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        let uri = self.resolve_jwks_uri().await?;
        let jwks: JwkSet = self.get_json(uri.clone()).await?;
        tracing::debug!(jwks_uri = %uri, keys = jwks.keys.len(), "fetched jwks");
        Ok(jwks)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, JwksError> {
        let response = self
            .http_client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| JwksError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(JwksError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| JwksError::Parse { url, source })
    }
}

#[async_trait]
impl KeySource for RemoteJwks {
    async fn jwk_set(&self) -> Result<Arc<JwkSet>, JwksError> {
        if let Some(keys) = self.cached().await {
            return Ok(keys);
        }

        let _refresh = self.refresh_lock.lock().await;
        // Another task may have refreshed while we waited.
        if let Some(keys) = self.cached().await {
            return Ok(keys);
        }

        let keys = match self.fetch().await {
            Ok(keys) => Arc::new(keys),
            Err(err) => {
                tracing::warn!(error = %err, issuer = %self.issuer, "jwks refresh failed");
                return Err(err);
            }
        };

        *self.cache.write().await = Some(CachedJwks {
            keys: Arc::clone(&keys),
            fetched_at: Instant::now(),
        });

        Ok(keys)
    }
}
