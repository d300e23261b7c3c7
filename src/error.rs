use axum::Json;
use axum::body::Body;
use axum::http::StatusCode;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username is already in use. Please choose a different one.")]
    UsernameTaken(String),

    #[error("Username or password does not match. Please try again.")]
    InvalidCredentials,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(String),

    // Session guard failures redirect to the login page.
    #[error("Please login.")]
    Unauthorized,

    #[error("no question has been issued for this session")]
    NoQuestionIssued,

    #[error("answer choice {index} is out of range for {len} choices")]
    ChoiceOutOfRange { index: usize, len: usize },

    #[error("no functions recorded yet; add study notes before taking a quiz")]
    EmptyQuestionPool,

    // Internal errors
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Others(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Generating response for AppError: {:?}", self);

        // Auth failures keep the flash-and-redirect contract: a 303 back to
        // the login page with the message in the body.
        if let Self::Unauthorized = self {
            return redirect_with_message("/login", &self.to_string());
        }

        let (status_code, message) = match &self {
            Self::UsernameTaken(_) => (StatusCode::CONFLICT, self.to_string()),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::NoQuestionIssued | Self::ChoiceOutOfRange { .. } | Self::EmptyQuestionPool => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "an internal server error occurred".to_string(),
            ),
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

/// 303 redirect carrying a flash-style message for non-browser clients.
pub fn redirect_with_message(location: &str, message: &str) -> Response {
    Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(LOCATION, location)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "message": message }).to_string()))
        .unwrap()
}
