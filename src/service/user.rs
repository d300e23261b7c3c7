use crate::domain::user::{User, progress_percent};
use crate::error::AppError;
use crate::service::require;
use crate::utils::jwt::Claims;
use crate::utils::password::{gen_salt, hash_password};
use crate::utils::state::AppState;
use crate::utils::validation::{is_valid_email, is_valid_username};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterReq {
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    email: String,
}

pub async fn show_register_form() -> impl IntoResponse {
    Json(json!({
        "fields": ["username", "password", "first_name", "last_name", "email"]
    }))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterReq>,
) -> Result<Response, AppError> {
    for (field, value) in [
        ("username", &req.username),
        ("password", &req.password),
        ("first_name", &req.first_name),
        ("last_name", &req.last_name),
        ("email", &req.email),
    ] {
        require(field, value)?;
    }
    if !is_valid_username(&req.username) {
        return Err(AppError::BadRequest(
            "username may only contain letters, digits, `.`, `_` and `-`".to_string(),
        ));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::BadRequest("email address is not valid".to_string()));
    }

    match state.user_storage.query_user_by_name(&req.username).await {
        // A taken username re-shows the form with a flash message and
        // leaves the existing account untouched.
        Ok(_) => Ok((
            StatusCode::OK,
            Json(json!({
                "registered": false,
                "message": AppError::UsernameTaken(req.username).to_string(),
            })),
        )
            .into_response()),
        Err(AppError::NotFound(_)) => {
            let salt = gen_salt();
            let password = {
                let salt = salt.clone();
                let password = req.password.clone();
                tokio::task::spawn_blocking(move || hash_password(&salt, &password))
                    .await
                    .map_err(|e| AppError::Others(e.to_string()))??
            };
            let user = User::new(
                req.username.clone(),
                password,
                salt,
                req.first_name,
                req.last_name,
                req.email,
            );
            // user + zero-point level land in one transaction
            state.user_storage.create_user(user).await?;
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "registered": true,
                    "message": format!("You have registered as {}.", req.username),
                })),
            )
                .into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_storage.query_user_by_name(&claims.sub).await?;
    let level = state.user_storage.query_level(user.id).await?;
    let progress = match state.session_progress(&user.username).await {
        Some(progress) => progress,
        None => {
            // session evaporated (e.g. restart); rebuild it from the store
            let progress = progress_percent(level.points);
            state.set_progress(&user.username, progress).await;
            progress
        }
    };
    Ok(Json(json!({
        "username": user.username,
        "points": level.points,
        "level": level.level,
        "progress": progress,
    })))
}

pub async fn user_info(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_storage.query_user_by_name(&claims.sub).await?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::state::test_state;
    use axum::body::to_bytes;

    fn ada_form() -> RegisterReq {
        RegisterReq {
            username: "ada".to_string(),
            password: "pw123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn registration_creates_account_at_level_zero() {
        let state = test_state().await;
        let res = register(State(state.clone()), Json(ada_form())).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let user = state.user_storage.query_user_by_name("ada").await.unwrap();
        let level = state.user_storage.query_level(user.id).await.unwrap();
        assert_eq!(level.points, 0);
        assert_eq!(level.level, 0);
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_noop() {
        let state = test_state().await;
        register(State(state.clone()), Json(ada_form())).await.unwrap();
        let first = state.user_storage.query_user_by_name("ada").await.unwrap();
        state.user_storage.award_point(first.id).await.unwrap();

        let mut second = ada_form();
        second.email = "impostor@example.com".to_string();
        let res = register(State(state.clone()), Json(second)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["registered"], false);

        let unchanged = state.user_storage.query_user_by_name("ada").await.unwrap();
        assert_eq!(unchanged.id, first.id);
        assert_eq!(unchanged.email, "ada@example.com");
        let level = state.user_storage.query_level(first.id).await.unwrap();
        assert_eq!(level.points, 1);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let state = test_state().await;
        let mut req = ada_form();
        req.password = "  ".to_string();
        assert!(matches!(
            register(State(state), Json(req)).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn dashboard_reports_points_level_and_progress() {
        let state = test_state().await;
        register(State(state.clone()), Json(ada_form())).await.unwrap();
        let user = state.user_storage.query_user_by_name("ada").await.unwrap();
        for _ in 0..6 {
            state.user_storage.award_point(user.id).await.unwrap();
        }

        let claims = Claims {
            sub: "ada".to_string(),
            exp: i64::MAX,
        };
        let res = dashboard(State(state.clone()), Extension(claims))
            .await
            .unwrap()
            .into_response();
        let body = body_json(res).await;
        assert_eq!(body["points"], 6);
        assert_eq!(body["level"], 1);
        assert_eq!(body["progress"], 20);
    }

    #[tokio::test]
    async fn profile_never_exposes_the_password_hash() {
        let state = test_state().await;
        register(State(state.clone()), Json(ada_form())).await.unwrap();
        let claims = Claims {
            sub: "ada".to_string(),
            exp: i64::MAX,
        };
        let res = user_info(State(state), Extension(claims))
            .await
            .unwrap()
            .into_response();
        let body = body_json(res).await;
        assert_eq!(body["username"], "ada");
        assert_eq!(body["email"], "ada@example.com");
        assert!(body.get("password").is_none());
        assert!(body.get("salt").is_none());
    }
}
