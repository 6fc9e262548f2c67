//! Libris Auth — password login, signed token issuance and refresh-token
//! rotation with replay detection.

pub mod config;
pub mod error;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use service::{AuthService, AuthTokens, LoginInput, RefreshInput};
pub use token::{Principal, TokenClaims, TokenCodec, TokenError, TokenKind};
