pub mod middleware;

use std::sync::Arc;

use crate::service::auth::{login, logout, show_login_form};
use crate::service::notes::{add_modules, show_add_modules, study_notes};
use crate::service::quiz::{process_question, show_question};
use crate::service::user::{dashboard, register, show_register_form, user_info};
use crate::utils::state::AppState;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router, middleware as axum_middleware};
use serde_json::json;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/{username}/dashboard", get(dashboard))
        .route("/{username}/info", get(user_info))
        .route("/{username}/studynotes", get(study_notes))
        .route("/{username}/addmodules", get(show_add_modules).post(add_modules))
        .route("/{username}/quiz", get(show_question).post(process_question))
        // authenticate runs first (outer), then the per-username check
        .layer(axum_middleware::from_fn(middleware::authorize))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate,
        ));

    Router::new()
        .route("/", get(homepage))
        .route("/register", get(show_register_form).post(register))
        .route("/login", get(show_login_form).post(login))
        .route("/logout", get(logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn homepage() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to studyhall. Register or log in to record study notes and quiz yourself on them.",
    }))
}
