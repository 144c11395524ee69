//! Data models for Taskdeck

mod task;
mod user;

pub use task::{NewTask, Task, TaskId, TaskPatch};
pub use user::User;
