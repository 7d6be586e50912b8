use serde::{Deserialize, Deserializer, Serialize};

/// Claims as they appear in the token payload.
///
/// NOTE:
/// - `aud` may be a single string or an array; both normalize to a list.
/// - `exp` is enforced by `jsonwebtoken::Validation` before this type is handed out.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenClaims {
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub sub: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub aud: Vec<String>,
    #[serde(default)]
    pub exp: i64,
    #[serde(default)]
    pub nbf: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub jti: Option<String>,

    #[serde(default)]
    pub scope: Option<String>,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(aud)) => vec![aud],
        Some(OneOrMany::Many(aud)) => aud,
        None => Vec::new(),
    })
}

/// Standard JWT claims of a validated token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisteredClaims {
    #[serde(rename = "iss", skip_serializing_if = "String::is_empty")]
    pub issuer: String,
    #[serde(rename = "sub", skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(rename = "aud", skip_serializing_if = "Vec::is_empty")]
    pub audience: Vec<String>,
    #[serde(rename = "exp", skip_serializing_if = "is_zero")]
    pub expiry: i64,
    #[serde(rename = "nbf", skip_serializing_if = "is_zero")]
    pub not_before: i64,
    #[serde(rename = "iat", skip_serializing_if = "is_zero")]
    pub issued_at: i64,
    #[serde(rename = "jti", skip_serializing_if = "String::is_empty")]
    pub id: String,
}

/// Provider-specific claims this API reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomClaims {
    pub scope: String,
}

/// Output of a successful token validation.
///
/// Produced once per request by the validator and handed to handlers through
/// request extensions. Serialized field names are the ones existing clients read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidatedClaims {
    #[serde(rename = "CustomClaims")]
    pub custom: CustomClaims,
    #[serde(rename = "RegisteredClaims")]
    pub registered: RegisteredClaims,
}

impl ValidatedClaims {
    pub fn subject(&self) -> &str {
        &self.registered.subject
    }

    pub fn scope(&self) -> &str {
        &self.custom.scope
    }
}

impl From<TokenClaims> for ValidatedClaims {
    fn from(claims: TokenClaims) -> Self {
        Self {
            custom: CustomClaims {
                scope: claims.scope.unwrap_or_default(),
            },
            registered: RegisteredClaims {
                issuer: claims.iss,
                subject: claims.sub,
                audience: claims.aud,
                expiry: claims.exp,
                not_before: claims.nbf.unwrap_or_default(),
                issued_at: claims.iat.unwrap_or_default(),
                id: claims.jti.unwrap_or_default(),
            },
        }
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}
