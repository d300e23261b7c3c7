use crate::config::Config;
use crate::error::AppError;
use crate::service::auth::TOKEN_COOKIE;
use crate::utils::jwt::{Claims, decode};
use crate::utils::state::AppState;
use axum::extract::{Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Decodes the signed identity token into request extensions. Every
/// protected route sits behind this plus `authorize`.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AppError> {
    let claims = extract_claims(&req, &jar, &state.config)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// A request for `/{username}/...` is only served to that user.
pub async fn authorize(
    Path(username): Path<String>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AppError::Unauthorized)?;
    ensure_owner(claims, &username)?;
    Ok(next.run(req).await)
}

pub fn ensure_owner(claims: &Claims, username: &str) -> Result<(), AppError> {
    if claims.sub == username {
        return Ok(());
    }
    Err(AppError::Unauthorized)
}

fn extract_claims(req: &Request, jar: &CookieJar, config: &Config) -> Result<Claims, AppError> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::to_string);
    let token = match bearer {
        Some(token) => token,
        None => jar
            .get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AppError::Unauthorized)?,
    };
    // any decode failure (bad signature, expiry) means "please login"
    decode(&config.jwt_secret, &token).map_err(|_| AppError::Unauthorized)
}
