pub mod jwt;
pub mod login;
pub mod token_issuer;

pub use jwt::{JwtIssuer, KeyError, SigningKey};
pub use login::Authenticator;
pub use token_issuer::{IssuedToken, Role, TokenIssuer, scopes_for};
