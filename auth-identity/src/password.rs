//! Credential validation and hashing.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::{AuthError, AuthResult};

pub fn validate_login(login: &str) -> AuthResult<()> {
    if login.is_empty() {
        return Err(AuthError::LoginRequired);
    }
    if login.chars().any(char::is_whitespace) {
        return Err(AuthError::LoginWhitespace);
    }
    Ok(())
}

/// Password policy, checked before any hashing work: 8–72 bytes, ASCII only,
/// no whitespace, at least one letter and one digit.
pub fn validate_password(password: &str) -> AuthResult<()> {
    if password.is_empty() {
        return Err(AuthError::PasswordRequired);
    }
    if password.chars().any(char::is_whitespace) {
        return Err(AuthError::PasswordWhitespace);
    }
    if password.len() > 72 {
        return Err(AuthError::PasswordTooLong);
    }
    if password.len() < 8 {
        return Err(AuthError::PasswordTooShort);
    }
    if !password.is_ascii() {
        return Err(AuthError::PasswordNonAscii);
    }

    let has_letter = password.bytes().any(|b| b.is_ascii_alphabetic());
    let has_digit = password.bytes().any(|b| b.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(AuthError::PasswordWeak);
    }

    Ok(())
}

pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::Hashing)?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> AuthResult<()> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::Hashing)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}
