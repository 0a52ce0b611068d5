use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::models::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, login: &str, password_hash: &str, role_id: i32)
        -> AuthResult<Uuid>;
    async fn find_by_login(&self, login: &str) -> AuthResult<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert_user(
        &self,
        login: &str,
        password_hash: &str,
        role_id: i32,
    ) -> AuthResult<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users.users (login, password_hash, role_id) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(login)
        .bind(password_hash)
        .bind(role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::UserAlreadyExists,
            _ => AuthError::Database(e),
        })?;

        Ok(id)
    }

    async fn find_by_login(&self, login: &str) -> AuthResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, login, password_hash, role_id, created_at \
             FROM users.users WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, login, password_hash, role_id, created_at \
             FROM users.users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
