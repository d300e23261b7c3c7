use crate::domain::notes::{Function, Module};
use crate::error::{AppError, redirect_with_message};
use crate::service::require;
use crate::utils::jwt::Claims;
use crate::utils::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize)]
struct ModuleNotes {
    #[serde(flatten)]
    module: Module,
    empty: bool,
    functions: Vec<Function>,
}

/// Study notes are scoped to the requesting user.
pub async fn study_notes(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_storage.query_user_by_name(&claims.sub).await?;
    let modules = state.notes_storage.list_modules_for_user(user.id).await?;
    let functions = state.notes_storage.list_functions_for_user(user.id).await?;

    let mut by_module: HashMap<Uuid, Vec<Function>> = HashMap::new();
    for function in functions {
        by_module.entry(function.module_id).or_default().push(function);
    }
    let notes: Vec<ModuleNotes> = modules
        .into_iter()
        .map(|module| {
            let functions = by_module.remove(&module.id).unwrap_or_default();
            ModuleNotes {
                empty: functions.is_empty(),
                functions,
                module,
            }
        })
        .collect();

    Ok(Json(json!({ "username": claims.sub, "modules": notes })))
}

pub async fn show_add_modules() -> impl IntoResponse {
    Json(json!({
        "fields": {
            "module": ["module_name", "module_description"],
            "function": ["function_name", "function_description", "sample_code", "output"],
            "optional": ["module_id"],
        }
    }))
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AddModulesReq {
    /// When set, the function is attached to this existing module instead
    /// of creating a new one.
    #[serde(default)]
    module_id: Option<Uuid>,
    #[serde(default)]
    module_name: Option<String>,
    #[serde(default)]
    module_description: Option<String>,
    #[serde(default)]
    function_name: Option<String>,
    #[serde(default)]
    function_description: Option<String>,
    #[serde(default)]
    sample_code: Option<String>,
    #[serde(default)]
    output: Option<String>,
}

pub async fn add_modules(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddModulesReq>,
) -> Result<Response, AppError> {
    let user = state.user_storage.query_user_by_name(&claims.sub).await?;

    match req.module_id {
        Some(module_id) => {
            let function = build_function(&req, module_id, user.id)?.ok_or_else(|| {
                AppError::BadRequest(
                    "`function_name` is required when adding to an existing module".to_string(),
                )
            })?;
            state.notes_storage.add_function(function).await?;
        }
        None => {
            let name = req.module_name.as_deref().unwrap_or_default();
            let description = req.module_description.as_deref().unwrap_or_default();
            require("module_name", name)?;
            require("module_description", description)?;
            let module = Module::new(user.id, name, description);
            let function = build_function(&req, module.id, user.id)?;
            // one transaction; a failed function insert rolls the module back
            state.notes_storage.create_module(module, function).await?;
        }
    }

    Ok(redirect_with_message(
        &format!("/{}/studynotes", claims.sub),
        "Your notes have been added.",
    ))
}

/// A function block is optional, but once named it must be complete.
fn build_function(
    req: &AddModulesReq,
    module_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Function>, AppError> {
    let Some(name) = req.function_name.as_deref().filter(|n| !n.trim().is_empty()) else {
        return Ok(None);
    };
    let description = req.function_description.clone().unwrap_or_default();
    let sample_code = req
        .sample_code
        .clone()
        .ok_or_else(|| AppError::BadRequest("`sample_code` is required for a function".to_string()))?;
    let output = req
        .output
        .clone()
        .ok_or_else(|| AppError::BadRequest("`output` is required for a function".to_string()))?;
    Ok(Some(Function::new(
        module_id,
        user_id,
        name,
        description,
        sample_code,
        output,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::utils::state::test_state;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::http::header::LOCATION;

    fn claims(name: &str) -> Claims {
        Claims {
            sub: name.to_string(),
            exp: i64::MAX,
        }
    }

    async fn seed_user(state: &Arc<AppState>, username: &str) -> User {
        let user = User::new(username, "hash", "salt", "Ada", "Lovelace", "ada@example.com");
        state.user_storage.create_user(user.clone()).await.unwrap();
        user
    }

    async fn listed_modules(state: &Arc<AppState>, username: &str) -> serde_json::Value {
        let res = study_notes(State(state.clone()), Extension(claims(username)))
            .await
            .unwrap()
            .into_response();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_module_is_flagged_until_a_function_arrives() {
        let state = test_state().await;
        seed_user(&state, "ada").await;

        let req = AddModulesReq {
            module_name: Some("Loops".to_string()),
            module_description: Some("iteration basics".to_string()),
            ..Default::default()
        };
        let res = add_modules(State(state.clone()), Extension(claims("ada")), Json(req))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/ada/studynotes");

        let body = listed_modules(&state, "ada").await;
        assert_eq!(body["modules"][0]["name"], "Loops");
        assert_eq!(body["modules"][0]["empty"], true);

        let module_id: Uuid =
            serde_json::from_value(body["modules"][0]["id"].clone()).unwrap();
        let req = AddModulesReq {
            module_id: Some(module_id),
            function_name: Some("count_up".to_string()),
            function_description: Some("prints 0..3".to_string()),
            sample_code: Some("for i in 0..3 { println!(\"{i}\") }".to_string()),
            output: Some("0\n1\n2".to_string()),
            ..Default::default()
        };
        add_modules(State(state.clone()), Extension(claims("ada")), Json(req))
            .await
            .unwrap();

        let body = listed_modules(&state, "ada").await;
        assert_eq!(body["modules"][0]["empty"], false);
        assert_eq!(body["modules"][0]["functions"][0]["name"], "count_up");
    }

    #[tokio::test]
    async fn module_and_function_are_added_together() {
        let state = test_state().await;
        seed_user(&state, "ada").await;

        let req = AddModulesReq {
            module_name: Some("Printing".to_string()),
            module_description: Some("output basics".to_string()),
            function_name: Some("greet".to_string()),
            function_description: Some("prints a greeting".to_string()),
            sample_code: Some("println!(\"hi\")".to_string()),
            output: Some("hi".to_string()),
            ..Default::default()
        };
        add_modules(State(state.clone()), Extension(claims("ada")), Json(req))
            .await
            .unwrap();

        let body = listed_modules(&state, "ada").await;
        assert_eq!(body["modules"][0]["empty"], false);
    }

    #[tokio::test]
    async fn incomplete_function_block_is_rejected() {
        let state = test_state().await;
        seed_user(&state, "ada").await;

        let req = AddModulesReq {
            module_name: Some("Loops".to_string()),
            module_description: Some("iteration".to_string()),
            function_name: Some("count_up".to_string()),
            // sample_code and output missing
            ..Default::default()
        };
        assert!(matches!(
            add_modules(State(state.clone()), Extension(claims("ada")), Json(req)).await,
            Err(AppError::BadRequest(_))
        ));
        // the module must not have been half-persisted
        let body = listed_modules(&state, "ada").await;
        assert_eq!(body["modules"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_requesting_user() {
        let state = test_state().await;
        seed_user(&state, "ada").await;
        seed_user(&state, "bob").await;

        let req = AddModulesReq {
            module_name: Some("Loops".to_string()),
            module_description: Some("iteration".to_string()),
            ..Default::default()
        };
        add_modules(State(state.clone()), Extension(claims("ada")), Json(req))
            .await
            .unwrap();

        let body = listed_modules(&state, "bob").await;
        assert_eq!(body["modules"].as_array().unwrap().len(), 0);
    }
}
