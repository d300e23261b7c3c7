use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Points needed to advance one level.
pub const POINTS_PER_LEVEL: i64 = 5;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub salt: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        salt: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        User {
            id: Uuid::new_v4(),
            username: username.into(),
            password: password.into(),
            salt: salt.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

/// One row per user, created together with the user at zero points.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Level {
    pub user_id: Uuid,
    pub points: i64,
    pub level: i64,
}

/// Percentage toward the next level: one of 0/20/40/60/80.
pub fn progress_percent(points: i64) -> i64 {
    (points % POINTS_PER_LEVEL) * 100 / POINTS_PER_LEVEL
}
