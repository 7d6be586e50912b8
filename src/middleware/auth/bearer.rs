//! `Authorization: Bearer <token>` extraction.

use axum::http::{HeaderMap, header};

const BEARER_SCHEME: &str = "Bearer ";

/// Returns the token from an `Authorization` header of the exact form
/// `Bearer <token>` (case-sensitive scheme, single space, non-empty token).
///
/// Absence is not an error: a missing header, another scheme, an empty token or
/// a value that is not visible ASCII all yield `None`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_SCHEME))
        .filter(|token| !token.is_empty())
}
