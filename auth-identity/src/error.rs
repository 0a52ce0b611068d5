use error_common::{Code, Fault};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("login required")]
    LoginRequired,

    #[error("login contains whitespace")]
    LoginWhitespace,

    #[error("password required")]
    PasswordRequired,

    #[error("password contains whitespace")]
    PasswordWhitespace,

    #[error("password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("password must not exceed 72 bytes")]
    PasswordTooLong,

    #[error("password must contain only ASCII characters")]
    PasswordNonAscii,

    #[error("password must contain at least one letter and one number")]
    PasswordWeak,

    #[error("role required and must be greater than zero")]
    RoleRequired,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("password hashing failed")]
    Hashing,

    #[error("token signing failed")]
    TokenSigning,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("token index error: {0}")]
    Cache(#[from] redis::RedisError),
}

impl Fault for AuthError {
    fn code(&self) -> Code {
        match self {
            AuthError::LoginRequired
            | AuthError::LoginWhitespace
            | AuthError::PasswordRequired
            | AuthError::PasswordWhitespace
            | AuthError::PasswordTooShort
            | AuthError::PasswordTooLong
            | AuthError::PasswordNonAscii
            | AuthError::PasswordWeak
            | AuthError::RoleRequired => Code::InvalidArgument,
            AuthError::UserAlreadyExists => Code::AlreadyExists,
            AuthError::UserNotFound => Code::NotFound,
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::TokenExpired => {
                Code::Unauthenticated
            }
            AuthError::Hashing
            | AuthError::TokenSigning
            | AuthError::Database(_)
            | AuthError::Cache(_) => Code::Internal,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
