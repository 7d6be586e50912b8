/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - validator: ClaimsValidator (内部で JWKS キャッシュを保持)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::auth::ClaimsValidator;

#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<dyn ClaimsValidator>,
}

impl AppState {
    pub fn new(validator: Arc<dyn ClaimsValidator>) -> Self {
        Self { validator }
    }
}
