use crate::domain::user::progress_percent;
use crate::error::AppError;
use crate::questions::{MAX_DISTRACTORS, build_question};
use crate::utils::jwt::Claims;
use crate::utils::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub async fn show_question(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let function = state
        .notes_storage
        .draw_random_function()
        .await?
        .ok_or(AppError::EmptyQuestionPool)?;
    let distractors = state
        .notes_storage
        .list_distractor_outputs(function.id, &function.output, MAX_DISTRACTORS as i64)
        .await?;

    let question = {
        let mut rng = rand::rng();
        build_question(&function, distractors, &mut rng)
    };
    state
        .put_question(&claims.sub, question.answer.clone(), question.choices.clone())
        .await;

    Ok(Json(json!({
        "question": question.prompt,
        "sample_code": question.sample_code,
        "answer_choices": question.choices,
    })))
}

/// The client echoes back a position into the issued choice list; the
/// session-held answer stays the source of truth.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnswerReq {
    answer: usize,
}

pub async fn process_question(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AnswerReq>,
) -> Result<impl IntoResponse, AppError> {
    let (answer, choices) = state.take_question(&claims.sub, req.answer).await?;

    if choices[req.answer] != answer {
        return Ok(Json(json!({
            "correct": false,
            "answer": answer,
            "message": "wrong. Don't give up. Keep studying, and you'll get it right next time!",
        })));
    }

    let user = state.user_storage.query_user_by_name(&claims.sub).await?;
    let level = state.user_storage.award_point(user.id).await?;
    let progress = progress_percent(level.points);
    state.set_progress(&claims.sub, progress).await;

    let message = if level.points % 5 == 0 {
        format!("CONGRATULATIONS!!! You've reached level {}", level.level)
    } else {
        "correct!".to_string()
    };
    Ok(Json(json!({
        "correct": true,
        "answer": answer,
        "message": message,
        "points": level.points,
        "level": level.level,
        "progress": progress,
    })))
}
