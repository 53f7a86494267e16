/*
 * Responsibility
 * - pipeline の stage (Authenticate / ValidateBody)
 * - Router 全体に掛ける transport layer (request-id, trace, CORS)
 */
pub mod authenticate;
pub mod cors;
pub mod http;
pub mod validate;

pub use authenticate::Authenticate;
pub use validate::ValidateBody;
