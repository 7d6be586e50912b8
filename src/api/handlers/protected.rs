/*
 * Responsibility
 * - /protected 以下の handler (middleware::auth::access の内側)
 * - claims は AuthClaims extractor で受け取る
 */
use axum::Json;
use serde::Serialize;

use crate::api::extractors::AuthClaims;
use crate::services::auth::ValidatedClaims;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user_id: String,
    pub claims: ValidatedClaims,
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub message: &'static str,
    pub user_id: String,
    pub scope: String,
}

pub async fn profile(AuthClaims(claims): AuthClaims) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: "This is a protected endpoint",
        user_id: claims.subject().to_string(),
        claims,
    })
}

pub async fn admin(AuthClaims(claims): AuthClaims) -> Json<AdminResponse> {
    Json(AdminResponse {
        message: "This is an admin endpoint",
        user_id: claims.subject().to_string(),
        scope: claims.scope().to_string(),
    })
}
