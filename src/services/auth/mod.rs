/*
 * Responsibility
 * - Bearer token の検証 (JWKS 取得 → 署名 + iss/aud/exp 検証)
 * - middleware からは ClaimsValidator trait だけを見る
 */
pub mod claims;
pub mod factory;
pub mod jwks;
pub mod validator;

pub use claims::ValidatedClaims;
pub use factory::build_claims_validator;
pub use validator::{ClaimsValidator, JwtValidator, ValidationError};
