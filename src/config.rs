/*
 * Responsibility
 * - 環境変数の読み込み (AUTH0_DOMAIN, AUTH0_AUDIENCE, PORT, CORS, JWKS)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_JWKS_CACHE_TTL_SECONDS: u64 = 5 * 60;
const DEFAULT_CLOCK_SKEW_SECONDS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// `https://<AUTH0_DOMAIN>/`; also the expected `iss` claim.
    pub issuer: Url,
    pub audience: String,
    /// Skips OIDC discovery when set.
    pub jwks_uri: Option<Url>,
    pub jwks_cache_ttl: Duration,
    pub allowed_clock_skew: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!(error = %err, "no .env file loaded");
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let domain = get("AUTH0_DOMAIN").ok_or(ConfigError::Missing("AUTH0_DOMAIN"))?;
        let audience = get("AUTH0_AUDIENCE").ok_or(ConfigError::Missing("AUTH0_AUDIENCE"))?;

        let issuer = Url::parse(&format!("https://{domain}/"))
            .ok()
            .filter(|url| url.path() == "/" && url.query().is_none())
            .ok_or(ConfigError::Invalid("AUTH0_DOMAIN"))?;

        let jwks_uri = get("JWKS_URI")
            .map(|v| Url::parse(&v).map_err(|_| ConfigError::Invalid("JWKS_URI")))
            .transpose()?;

        let jwks_cache_ttl = parse_seconds(
            get("JWKS_CACHE_TTL_SECONDS"),
            "JWKS_CACHE_TTL_SECONDS",
            DEFAULT_JWKS_CACHE_TTL_SECONDS,
        )?;
        let allowed_clock_skew = parse_seconds(
            get("ALLOWED_CLOCK_SKEW_SECONDS"),
            "ALLOWED_CLOCK_SKEW_SECONDS",
            DEFAULT_CLOCK_SKEW_SECONDS,
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            issuer,
            audience,
            jwks_uri,
            jwks_cache_ttl,
            allowed_clock_skew,
        })
    }
}

fn parse_seconds(
    value: Option<String>,
    key: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let secs = match value {
        Some(v) => v.parse::<u64>().map_err(|_| ConfigError::Invalid(key))?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}
