use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A named grouping of related functions authored by a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Module {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
}

impl Module {
    pub fn new(user_id: Uuid, name: impl Into<String>, description: impl Into<String>) -> Self {
        Module {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A recorded code snippet with its expected output, the unit quizzed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Function {
    pub id: Uuid,
    pub module_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub sample_code: String,
    pub output: String,
}

impl Function {
    pub fn new(
        module_id: Uuid,
        user_id: Uuid,
        name: impl Into<String>,
        description: impl Into<String>,
        sample_code: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Function {
            id: Uuid::new_v4(),
            module_id,
            user_id,
            name: name.into(),
            description: description.into(),
            sample_code: sample_code.into(),
            output: output.into(),
        }
    }
}
