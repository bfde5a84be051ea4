//! Application layer logic for tasklist.
//!
//! This crate owns the task-store state machine and project configuration
//! shared by every front end.

pub mod action;
pub mod config;
pub mod task_store;

// Re-exports for convenience
pub use action::TaskAction;
pub use config::{ProjectConfig, StorageConfig};
pub use task_store::{ClearConfirmation, TaskStore};
