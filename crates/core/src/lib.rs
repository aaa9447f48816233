pub mod format;
pub mod projector;
pub mod types;
