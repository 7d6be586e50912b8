/*
 * Responsibility
 * - URL 構造を定義
 * - /protected 以下にだけ Bearer 検証 middleware を掛ける
 */
use axum::{Router, routing::get};

use crate::api::handlers::{
    protected::{admin, profile},
    public::{public, root},
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(profile))
        .route("/admin", get(admin));
    let protected = middleware::auth::access::apply(protected, state);

    Router::new()
        .route("/", get(root))
        .route("/public", get(public))
        .nest("/protected", protected)
}
