/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http (request-id / trace / catch-panic / limit / timeout), cors, auth
 */
pub mod auth;
pub mod cors;
pub mod http;
