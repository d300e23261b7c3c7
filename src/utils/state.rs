use crate::config::Config;
use crate::domain::notes::{NotesRepository, SqliteNotesRepository};
use crate::domain::user::{SqliteUserRepository, UserRepository};
use crate::error::AppError;
use sqlx::{Pool, Sqlite};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Per-identity quiz state. `answer` is Some while a question is in flight;
/// submitting or issuing a new question replaces it.
#[derive(Clone, Debug, Default)]
pub struct QuizSession {
    pub progress: i64,
    pub answer: Option<String>,
    pub answer_choices: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, QuizSession>>>,
    pub user_storage: Arc<dyn UserRepository>,
    pub notes_storage: Arc<dyn NotesRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, pool: Arc<Pool<Sqlite>>) -> Self {
        AppState {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            user_storage: Arc::new(SqliteUserRepository::new(pool.clone())),
            notes_storage: Arc::new(SqliteNotesRepository::new(pool)),
            config: Arc::new(config),
        }
    }

    pub async fn open_session(&self, username: &str, progress: i64) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            username.to_string(),
            QuizSession {
                progress,
                ..Default::default()
            },
        );
    }

    pub async fn close_session(&self, username: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(username);
    }

    pub async fn session_progress(&self, username: &str) -> Option<i64> {
        let sessions = self.sessions.read().await;
        sessions.get(username).map(|s| s.progress)
    }

    pub async fn set_progress(&self, username: &str, progress: i64) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(username.to_string()).or_default().progress = progress;
    }

    /// Stores a freshly issued question, overwriting any in-flight one.
    pub async fn put_question(&self, username: &str, answer: String, choices: Vec<String>) {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(username.to_string()).or_default();
        session.answer = Some(answer);
        session.answer_choices = choices;
    }

    /// Consumes the in-flight question after bounds-checking the submitted
    /// index. Out-of-range indices leave the question issued so the client
    /// can resubmit a valid one.
    pub async fn take_question(
        &self,
        username: &str,
        index: usize,
    ) -> Result<(String, Vec<String>), AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(username)
            .ok_or(AppError::NoQuestionIssued)?;
        let Some(answer) = session.answer.take() else {
            return Err(AppError::NoQuestionIssued);
        };
        let len = session.answer_choices.len();
        if index >= len {
            session.answer = Some(answer);
            return Err(AppError::ChoiceOutOfRange { index, len });
        }
        Ok((answer, std::mem::take(&mut session.answer_choices)))
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> Arc<Pool<Sqlite>> {
    use sqlx::sqlite::SqlitePoolOptions;

    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!().run(&pool).await.expect("migrations");
    Arc::new(pool)
}

#[cfg(test)]
pub(crate) async fn test_state() -> Arc<AppState> {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        db_url: "sqlite::memory:".to_string(),
        jwt_secret: "secret".to_string(),
        jwt_lifetime_secs: 3600,
    };
    Arc::new(AppState::new(config, test_pool().await))
}
