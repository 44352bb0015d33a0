/*!
 * Authorization context extractor
 *
 * Responsibility:
 * - Hand the authorized request context (AuthCtx) to handlers
 * - axum specifics stay in core; the type lives in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
