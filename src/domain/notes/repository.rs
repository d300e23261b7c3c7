use crate::domain::notes::{Function, Module};
use crate::error::AppError;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

type Result<T> = std::result::Result<T, AppError>;

#[async_trait::async_trait]
pub trait NotesRepository: Send + Sync {
    /// Inserts the module and, when given, its first function in one
    /// transaction; a failed function insert rolls the module back.
    async fn create_module(&self, module: Module, function: Option<Function>) -> Result<()>;

    /// Attaches a function to an existing module.
    async fn add_function(&self, function: Function) -> Result<()>;

    async fn list_modules_for_user(&self, user_id: Uuid) -> Result<Vec<Module>>;

    async fn list_functions_for_user(&self, user_id: Uuid) -> Result<Vec<Function>>;

    /// Uniform draw over every stored function, all users included.
    async fn draw_random_function(&self) -> Result<Option<Function>>;

    /// Distinct outputs of other functions, excluding the correct answer text.
    async fn list_distractor_outputs(
        &self,
        exclude: Uuid,
        answer: &str,
        limit: i64,
    ) -> Result<Vec<String>>;
}

#[derive(Debug)]
pub struct SqliteNotesRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteNotesRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl NotesRepository for SqliteNotesRepository {
    async fn create_module(&self, module: Module, function: Option<Function>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO modules (id, user_id, name, description) VALUES ($1, $2, $3, $4)")
            .bind(module.id)
            .bind(module.user_id)
            .bind(module.name)
            .bind(module.description)
            .execute(&mut *tx)
            .await?;
        if let Some(function) = function {
            sqlx::query(
                "INSERT INTO functions (id, module_id, user_id, name, description, sample_code, output) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(function.id)
            .bind(function.module_id)
            .bind(function.user_id)
            .bind(function.name)
            .bind(function.description)
            .bind(function.sample_code)
            .bind(function.output)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn add_function(&self, function: Function) -> Result<()> {
        sqlx::query(
            "INSERT INTO functions (id, module_id, user_id, name, description, sample_code, output) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(function.id)
        .bind(function.module_id)
        .bind(function.user_id)
        .bind(function.name)
        .bind(function.description)
        .bind(function.sample_code)
        .bind(function.output)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn list_modules_for_user(&self, user_id: Uuid) -> Result<Vec<Module>> {
        Ok(
            sqlx::query_as::<_, Module>("select * from modules where user_id = $1 order by name")
                .bind(user_id)
                .fetch_all(self.pool.as_ref())
                .await?,
        )
    }

    async fn list_functions_for_user(&self, user_id: Uuid) -> Result<Vec<Function>> {
        Ok(
            sqlx::query_as::<_, Function>("select * from functions where user_id = $1")
                .bind(user_id)
                .fetch_all(self.pool.as_ref())
                .await?,
        )
    }

    async fn draw_random_function(&self) -> Result<Option<Function>> {
        Ok(
            sqlx::query_as::<_, Function>("select * from functions order by random() limit 1")
                .fetch_optional(self.pool.as_ref())
                .await?,
        )
    }

    async fn list_distractor_outputs(
        &self,
        exclude: Uuid,
        answer: &str,
        limit: i64,
    ) -> Result<Vec<String>> {
        Ok(sqlx::query_scalar::<_, String>(
            "select distinct output from functions \
             where id != $1 and output != $2 order by random() limit $3",
        )
        .bind(exclude)
        .bind(answer)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?)
    }
}
