use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] taskdeck_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Not signed in. Run `taskdeck auth login` first.")]
    NotSignedIn,
    #[error("Failed to load tasks: {0}")]
    LoadFailed(String),
    #[error("Task ID cannot be empty")]
    EmptyTaskId,
    #[error("Invalid task ID: {0}")]
    InvalidTaskId(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Task {0} is busy, try again")]
    TaskBusy(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Edited task is empty, nothing saved")]
    EmptyEditedContent,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Token cannot be empty")]
    EmptyToken,
    #[error("Could not resolve a configuration directory for the session token")]
    NoConfigDir,
}
