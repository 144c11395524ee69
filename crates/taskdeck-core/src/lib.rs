//! taskdeck-core - Core library for Taskdeck
//!
//! This crate contains the task models, the bearer-token store, the REST API
//! client, and the framework-agnostic task item / task list / dashboard state
//! machines used by the Taskdeck front ends.

pub mod api;
pub mod auth;
pub mod busy;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod item;
pub mod list;
pub mod models;
pub mod util;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use models::{NewTask, Task, TaskId, TaskPatch, User};
