mod model;
mod repository;

pub use model::{Function, Module};
pub use repository::{NotesRepository, SqliteNotesRepository};
