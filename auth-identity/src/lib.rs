//! Authentication core: user registration, password verification, and the
//! access/refresh session-token lifecycle with server-side validity records.

pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token_index;
pub mod tokens;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use models::{SessionTokens, User};
pub use repository::{PgUserRepository, UserRepository};
pub use service::AuthService;
pub use token_index::{RedisTokenIndex, TokenIndex, TokenKind};
pub use tokens::{SessionClaims, TokenSigner};
