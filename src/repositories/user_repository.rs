use crate::models::{Role, ServiceError, User};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError>;
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
        staff_id: Option<i64>,
    ) -> Result<User, ServiceError>;
    async fn count(&self) -> Result<i64, ServiceError>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, staff_id, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, staff_id, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
        staff_id: Option<i64>,
    ) -> Result<User, ServiceError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, role, staff_id, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, username, password_hash, role, staff_id, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(staff_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn count(&self) -> Result<i64, ServiceError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
