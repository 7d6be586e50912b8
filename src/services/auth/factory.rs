/// Factory: build the production `ClaimsValidator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::jwks::{JwksError, RemoteJwks};
use crate::services::auth::{ClaimsValidator, JwtValidator};

pub fn build_claims_validator(config: &Config) -> Result<Arc<dyn ClaimsValidator>, JwksError> {
    let keys = RemoteJwks::new(
        config.issuer.clone(),
        config.jwks_uri.clone(),
        config.jwks_cache_ttl,
    )?;

    tracing::debug!(?keys, audience = %config.audience, "claims validator configured");

    let validator: Arc<dyn ClaimsValidator> = Arc::new(JwtValidator::new(
        Arc::new(keys),
        &config.issuer,
        &config.audience,
        config.allowed_clock_skew,
    ));
    Ok(validator)
}
