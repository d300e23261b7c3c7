use crate::domain::user::{Level, User};
use crate::error::AppError;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

type Result<T> = std::result::Result<T, AppError>;

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn query_user_by_name(&self, name: &str) -> Result<User>;

    /// Inserts the user and its zero-point level row in one transaction.
    async fn create_user(&self, user: User) -> Result<()>;

    async fn query_level(&self, user_id: Uuid) -> Result<Level>;

    /// Atomic single-point award; returns the post-increment row.
    async fn award_point(&self, user_id: Uuid) -> Result<Level>;
}

#[derive(Debug)]
pub struct SqliteUserRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteUserRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for SqliteUserRepository {
    async fn query_user_by_name(&self, name: &str) -> Result<User> {
        sqlx::query_as::<_, User>("select * from users where username = $1")
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {name}")))
    }

    async fn create_user(&self, user: User) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO users (id, username, password, salt, first_name, last_name, email, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id)
        .bind(user.username)
        .bind(user.password)
        .bind(user.salt)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await?;
        sqlx::query("INSERT INTO levels (user_id, points, level) VALUES ($1, 0, 0)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn query_level(&self, user_id: Uuid) -> Result<Level> {
        sqlx::query_as::<_, Level>("select * from levels where user_id = $1")
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("level for user {user_id}")))
    }

    async fn award_point(&self, user_id: Uuid) -> Result<Level> {
        // points and level move together, so the invariant level = points / 5
        // holds after every commit and concurrent awards never lose a point.
        sqlx::query_as::<_, Level>(
            "UPDATE levels SET points = points + 1, level = (points + 1) / 5 \
             WHERE user_id = $1 RETURNING user_id, points, level",
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("level for user {user_id}")))
    }
}
