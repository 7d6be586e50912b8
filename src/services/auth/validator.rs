use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{Jwk, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use url::Url;

use super::claims::{TokenClaims, ValidatedClaims};
use super::jwks::{JwksError, KeySource};

/// Reasons a bearer token is refused. The display string is what clients see
/// after `invalid token: `.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("could not parse the token: {0}")]
    Malformed(String),
    #[error("unexpected signing algorithm {0:?}")]
    UnexpectedAlgorithm(Algorithm),
    #[error("no signing key found for kid {0:?}")]
    UnknownKid(String),
    #[error("no signing keys available")]
    NoSigningKeys,
    #[error("signing key is unusable: {0}")]
    InvalidKey(String),
    #[error("could not fetch signing keys: {0}")]
    KeySet(#[from] JwksError),
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is expired")]
    Expired,
    #[error("token is not valid yet")]
    Immature,
    #[error("token issued in the future")]
    IssuedInFuture,
    #[error("token has invalid issuer")]
    InvalidIssuer,
    #[error("token has invalid audience")]
    InvalidAudience,
    #[error("token is missing required claim {0:?}")]
    MissingClaim(String),
}

impl From<jsonwebtoken::errors::Error> for ValidationError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::Immature,
            ErrorKind::InvalidIssuer => Self::InvalidIssuer,
            ErrorKind::InvalidAudience => Self::InvalidAudience,
            ErrorKind::MissingRequiredClaim(claim) => Self::MissingClaim(claim.clone()),
            // The header was already pinned to RS256; a mismatch here is the key's.
            ErrorKind::InvalidAlgorithm => Self::InvalidKey(e.to_string()),
            _ => Self::Malformed(e.to_string()),
        }
    }
}

/// Turns a bearer token into validated claims.
#[async_trait]
pub trait ClaimsValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<ValidatedClaims, ValidationError>;
}

/// RS256 validator backed by the identity provider's key set.
///
/// `jsonwebtoken::Validation` checks:
/// - signature
/// - `exp` (required) and `nbf` (when present), with `leeway`
/// - `iss` and `aud`
///
/// `iat` is checked here after decoding, with the same leeway.
pub struct JwtValidator {
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl std::fmt::Debug for JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtValidator {
    pub fn new(
        keys: Arc<dyn KeySource>,
        issuer: &Url,
        audience: &str,
        allowed_clock_skew: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = allowed_clock_skew.as_secs();

        Self { keys, validation }
    }

    fn decode_with(&self, token: &str, jwk: &Jwk) -> Result<ValidatedClaims, ValidationError> {
        let key =
            DecodingKey::from_jwk(jwk).map_err(|e| ValidationError::InvalidKey(e.to_string()))?;
        let data = jsonwebtoken::decode::<TokenClaims>(token, &key, &self.validation)?;

        let latest = jsonwebtoken::get_current_timestamp().saturating_add(self.validation.leeway);
        if data
            .claims
            .iat
            .is_some_and(|iat| u64::try_from(iat).is_ok_and(|iat| iat > latest))
        {
            return Err(ValidationError::IssuedInFuture);
        }

        Ok(data.claims.into())
    }
}

fn is_signing_key(jwk: &Jwk) -> bool {
    !matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption))
}

#[async_trait]
impl ClaimsValidator for JwtValidator {
    async fn validate(&self, token: &str) -> Result<ValidatedClaims, ValidationError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(ValidationError::UnexpectedAlgorithm(header.alg));
        }

        let jwks = self.keys.jwk_set().await?;

        if let Some(kid) = header.kid {
            let jwk = jwks
                .find(&kid)
                .filter(|jwk| is_signing_key(jwk))
                .ok_or_else(|| ValidationError::UnknownKid(kid.clone()))?;
            return self.decode_with(token, jwk);
        }

        // No kid: the first signing key that verifies decides. Claim errors
        // from that key are final; only key mismatches move on to the next.
        let mut last_err = ValidationError::NoSigningKeys;
        for jwk in jwks.keys.iter().filter(|jwk| is_signing_key(jwk)) {
            match self.decode_with(token, jwk) {
                Ok(claims) => return Ok(claims),
                Err(err @ (ValidationError::InvalidSignature | ValidationError::InvalidKey(_))) => {
                    last_err = err
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err)
    }
}
