//! Server-side token validity records.
//!
//! For every issued token a `(token → user id)` record lands in the fast
//! tier with an expiry equal to the token's remaining lifetime. A token
//! whose record is gone is dead regardless of its signature, which is what
//! makes refresh rotation enforceable.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::AuthResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn key_prefix(self) -> &'static str {
        match self {
            TokenKind::Access => "access_token:",
            TokenKind::Refresh => "refresh_token:",
        }
    }

    pub fn key(self, token: &str) -> String {
        format!("{}{}", self.key_prefix(), token)
    }
}

#[async_trait]
pub trait TokenIndex: Send + Sync {
    async fn save(
        &self,
        kind: TokenKind,
        token: &str,
        user_id: &str,
        ttl_secs: u64,
    ) -> AuthResult<()>;
    async fn get(&self, kind: TokenKind, token: &str) -> AuthResult<Option<String>>;
    async fn delete(&self, kind: TokenKind, token: &str) -> AuthResult<()>;
}

pub struct RedisTokenIndex {
    redis: ConnectionManager,
}

impl RedisTokenIndex {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl TokenIndex for RedisTokenIndex {
    async fn save(
        &self,
        kind: TokenKind,
        token: &str,
        user_id: &str,
        ttl_secs: u64,
    ) -> AuthResult<()> {
        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(kind.key(token), user_id, ttl_secs)
            .await?;
        Ok(())
    }

    async fn get(&self, kind: TokenKind, token: &str) -> AuthResult<Option<String>> {
        let mut conn = self.redis.clone();
        let user_id: Option<String> = conn.get(kind.key(token)).await?;
        Ok(user_id)
    }

    async fn delete(&self, kind: TokenKind, token: &str) -> AuthResult<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(kind.key(token)).await?;
        Ok(())
    }
}
