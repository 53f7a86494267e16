pub mod access_jwt;
pub mod factory;
pub mod identity;
pub mod jwt;

pub use access_jwt::TokenAuthenticator;
pub use factory::{AuthServices, build_auth_services};
pub use identity::Identity;
pub use jwt::JwtIssuer;
