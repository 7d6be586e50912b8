use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::ValidatedClaims;

/// Handler で ValidatedClaims を受け取るための extractor
/// middleware が ValidatedClaims を request.extensions() に insert 済みである前提
/// 見つからない場合は 500 (middleware 未設定 = サーバ側の配線ミス)
#[derive(Debug, Clone)]
pub struct AuthClaims(pub ValidatedClaims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ValidatedClaims>()
            .cloned()
            .map(AuthClaims)
            .ok_or_else(|| {
                tracing::error!(uri = %parts.uri, "claims missing; is the auth middleware applied?");
                AppError::ClaimsMissing
            })
    }
}
