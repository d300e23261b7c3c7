mod model;
mod repository;

pub use model::{Level, User, progress_percent};
pub use repository::{SqliteUserRepository, UserRepository};
