//! Access token (JWT) verification → `ValidatedClaims` を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` が無ければ 401 (missing or invalid token)
//! - 署名 + iss/aud/exp の検証は `ClaimsValidator` 側で実施し、失敗理由をそのまま 401 の detail にする
//! - 成功時は claims を request extensions に載せ、handler は `AuthClaims` extractor で受け取る

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use super::bearer::extract_bearer_token;
use crate::error::AppError;
use crate::state::AppState;

/// Protect every route of `router` with bearer-token validation.
///
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// let app = Router::new().nest("/protected", protected);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_bearer_token(req.headers()) else {
        tracing::debug!(uri = %req.uri(), "request without bearer token");
        return Err(AppError::MissingToken);
    };

    let claims = match state.validator.validate(token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, uri = %req.uri(), "access token verification failed");
            return Err(AppError::InvalidToken(err.to_string()));
        }
    };

    tracing::debug!(sub = %claims.subject(), "access token accepted");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::{http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;
    use crate::services::auth::{ClaimsValidator, ValidatedClaims, ValidationError};

    /// Accepts only the token "good"; counts calls.
    #[derive(Default)]
    struct StubValidator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ClaimsValidator for StubValidator {
        async fn validate(&self, token: &str) -> Result<ValidatedClaims, ValidationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if token == "good" {
                let mut claims = ValidatedClaims::default();
                claims.registered.subject = "auth0|stub".to_string();
                Ok(claims)
            } else {
                Err(ValidationError::Expired)
            }
        }
    }

    fn router(validator: Arc<StubValidator>) -> Router {
        let state = AppState::new(validator);
        let protected = Router::new().route(
            "/whoami",
            get(|req: Request<Body>| async move {
                req.extensions()
                    .get::<ValidatedClaims>()
                    .map(|c| c.subject().to_string())
                    .unwrap_or_default()
            }),
        );
        apply(protected, state.clone()).with_state(state)
    }

    async fn call(router: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        let response = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn missing_token_short_circuits_without_validation() {
        let validator = Arc::new(StubValidator::default());

        let (status, body) = call(router(validator.clone()), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("missing or invalid token"));
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_scheme_is_treated_as_missing() {
        let validator = Arc::new(StubValidator::default());

        let (status, body) = call(router(validator.clone()), Some("bearer good")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("missing or invalid token"));
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn validator_error_is_forwarded() {
        let validator = Arc::new(StubValidator::default());

        let (status, body) = call(router(validator.clone()), Some("Bearer stale")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("invalid token: token is expired"));
        assert_eq!(validator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_claims() {
        let validator = Arc::new(StubValidator::default());

        let (status, body) = call(router(validator.clone()), Some("Bearer good")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "auth0|stub");
        assert_eq!(validator.calls.load(Ordering::SeqCst), 1);
    }
}
