/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストの claims (ValidatedClaims) を handler に型付きで渡す
 * - 検証そのものは middleware::auth::access の責務
 */

mod core;

pub use core::AuthClaims;
