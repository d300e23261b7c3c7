use crate::domain::user::progress_percent;
use crate::error::{AppError, redirect_with_message};
use crate::utils::jwt::{decode, gen_token};
use crate::utils::password::check_password;
use crate::utils::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub const TOKEN_COOKIE: &str = "token";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginReq {
    username: String,
    password: String,
}

pub async fn show_login_form() -> impl IntoResponse {
    Json(json!({ "fields": ["username", "password"] }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginReq>,
) -> Result<impl IntoResponse, AppError> {
    // An unknown user and a bad password answer identically, so the
    // response never confirms whether a username exists.
    let user = match state.user_storage.query_user_by_name(&req.username).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => return Err(AppError::InvalidCredentials),
        Err(e) => return Err(e),
    };
    {
        let expected = user.password.clone();
        let candidate = req.password.clone();
        // Check password is a rather time-consuming operation. So it should
        // be executed in `spawn_blocking`.
        tokio::task::spawn_blocking(move || check_password(&expected, &candidate))
            .await
            .map_err(|e| AppError::Others(e.to_string()))??;
    }

    let level = state.user_storage.query_level(user.id).await?;
    state
        .open_session(&user.username, progress_percent(level.points))
        .await;

    let token = gen_token(
        state.config.jwt_lifetime_secs,
        &state.config.jwt_secret,
        &user.username,
    );
    let jar = jar.add(Cookie::build((TOKEN_COOKIE, token)).path("/").http_only(true));

    Ok((
        jar,
        redirect_with_message(
            &format!("/{}/dashboard", user.username),
            &format!("Welcome. You are logged in as {}.", user.username),
        ),
    ))
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        if let Ok(claims) = decode(&state.config.jwt_secret, cookie.value()) {
            state.close_session(&claims.sub).await;
        }
    }
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (jar, redirect_with_message("/", "You are logged out."))
}
