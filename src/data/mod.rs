//! Input data handling

pub mod loader;

pub use loader::{load_follow_records, EdgeSource};
