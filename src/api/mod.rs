/*
 * Responsibility
 * - URL 構造 (routes) と handler / extractor の公開
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
