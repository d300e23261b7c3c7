use crate::error::AppError;

pub mod auth;
pub mod notes;
pub mod quiz;
pub mod user;

/// Form fields are free text but must at least be present.
pub(crate) fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("`{field}` must not be empty")));
    }
    Ok(())
}
