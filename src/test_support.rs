//! Fixed RSA keys and token helpers shared by unit tests.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;

pub const ISSUER: &str = "https://tenant.example.com/";
pub const AUDIENCE: &str = "https://api.example.com";
pub const KID: &str = "test-key";

const SIGNING_KEY_PEM: &str = include_str!("../tests/fixtures/signing_key.pem");
const FOREIGN_KEY_PEM: &str = include_str!("../tests/fixtures/foreign_key.pem");
const JWKS_JSON: &str = include_str!("../tests/fixtures/jwks.json");
const FOREIGN_JWKS_JSON: &str = include_str!("../tests/fixtures/foreign_jwks.json");

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

pub fn jwks_json() -> serde_json::Value {
    serde_json::from_str(JWKS_JSON).unwrap()
}

/// Public half of the signing key, published under [`KID`].
pub fn jwk_set() -> JwkSet {
    serde_json::from_str(JWKS_JSON).unwrap()
}

/// A key set that does not contain the signing key.
pub fn foreign_jwk_set() -> JwkSet {
    serde_json::from_str(FOREIGN_JWKS_JSON).unwrap()
}

/// Claims the validator under test accepts, valid for an hour.
pub fn claims(sub: &str) -> serde_json::Value {
    let now = now();
    json!({
        "iss": ISSUER,
        "sub": sub,
        "aud": AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "scope": "read:profile",
    })
}

fn encode(claims: &serde_json::Value, kid: Option<&str>, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

pub fn sign(claims: &serde_json::Value) -> String {
    encode(claims, Some(KID), SIGNING_KEY_PEM)
}

pub fn sign_with_kid(claims: &serde_json::Value, kid: Option<&str>) -> String {
    encode(claims, kid, SIGNING_KEY_PEM)
}

/// Signed by a key outside [`jwk_set`] but claiming its kid.
pub fn sign_with_foreign_key(claims: &serde_json::Value) -> String {
    encode(claims, Some(KID), FOREIGN_KEY_PEM)
}
