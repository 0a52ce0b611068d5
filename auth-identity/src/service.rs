use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::models::{SessionTokens, ADMIN_ROLE_ID};
use crate::password::{hash_password, validate_login, validate_password, verify_password};
use crate::repository::UserRepository;
use crate::token_index::{TokenIndex, TokenKind};
use crate::tokens::TokenSigner;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenIndex>,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenIndex>,
        signer: TokenSigner,
    ) -> Self {
        Self {
            users,
            tokens,
            signer,
        }
    }

    /// Enroll a user. All credential validation happens before the hash is
    /// computed; a duplicate login surfaces as `UserAlreadyExists`.
    pub async fn register(&self, login: &str, password: &str, role_id: i32) -> AuthResult<Uuid> {
        validate_login(login)?;
        validate_password(password)?;
        if role_id <= 0 {
            return Err(AuthError::RoleRequired);
        }

        let password_hash = hash_password(password)?;
        let user_id = self.users.insert_user(login, &password_hash, role_id).await?;

        info!(login, user_id = %user_id, "user registered");
        Ok(user_id)
    }

    /// Verify credentials and issue a fresh token pair.
    ///
    /// An unknown login and a wrong password are indistinguishable to the
    /// caller: both are `InvalidCredentials`.
    pub async fn login(&self, login: &str, password: &str) -> AuthResult<(Uuid, SessionTokens)> {
        if login.is_empty() {
            return Err(AuthError::LoginRequired);
        }
        if password.is_empty() {
            return Err(AuthError::PasswordRequired);
        }

        let user = self
            .users
            .find_by_login(login)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        let pair = self.issue_pair(&user.id.to_string()).await?;
        info!(login, user_id = %user.id, "user logged in");
        Ok((user.id, pair))
    }

    /// Rotate a refresh token: validate it, issue a new pair, then revoke
    /// the presented token's validity record so it cannot be replayed.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<SessionTokens> {
        if refresh_token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let claims = self.signer.verify(refresh_token)?;
        if !claims.is_refresh {
            return Err(AuthError::InvalidToken);
        }

        let user_id = self
            .tokens
            .get(TokenKind::Refresh, refresh_token)
            .await?
            .ok_or_else(|| {
                warn!("refresh token has no validity record");
                AuthError::InvalidToken
            })?;

        let pair = self.issue_pair(&user_id).await?;
        self.tokens.delete(TokenKind::Refresh, refresh_token).await?;

        Ok(pair)
    }

    pub async fn is_admin(&self, user_id: Uuid) -> AuthResult<bool> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(user.role_id == ADMIN_ROLE_ID)
    }

    async fn issue_pair(&self, user_id: &str) -> AuthResult<SessionTokens> {
        let access_token = self.signer.mint(user_id, false)?;
        let refresh_token = self.signer.mint(user_id, true)?;

        self.tokens
            .save(
                TokenKind::Access,
                &access_token,
                user_id,
                self.signer.access_ttl_secs().max(0) as u64,
            )
            .await?;
        self.tokens
            .save(
                TokenKind::Refresh,
                &refresh_token,
                user_id,
                self.signer.refresh_ttl_secs().max(0) as u64,
            )
            .await?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }
}
