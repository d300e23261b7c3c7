pub mod notes;
pub mod user;
