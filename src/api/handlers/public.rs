/*
 * Responsibility
 * - GET /, GET /public (認証なし、常に 200)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "Auth0 Backend API" })))
}

pub async fn public() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "message": "This is a public endpoint accessible without authentication"
        })),
    )
}
