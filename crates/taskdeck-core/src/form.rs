//! Task creation form state.

use crate::api::TaskApi;
use crate::busy::{BusyFlag, BusyGuard};
use crate::error::Result;
use crate::models::{NewTask, Task};

#[derive(Debug)]
#[must_use]
pub struct SubmitTicket {
    task: NewTask,
    _guard: BusyGuard,
}

impl SubmitTicket {
    pub const fn task(&self) -> &NewTask {
        &self.task
    }
}

#[derive(Debug, Default)]
pub struct TaskForm {
    title: String,
    description: String,
    error: Option<String>,
    busy: BusyFlag,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Snapshots the fields into a create payload. A blank description is omitted.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        let guard = self.busy.try_acquire()?;
        let description = if self.description.trim().is_empty() {
            None
        } else {
            Some(self.description.clone())
        };
        self.error = None;
        Some(SubmitTicket {
            task: NewTask {
                title: self.title.clone(),
                description,
            },
            _guard: guard,
        })
    }

    /// Clears the fields on success; keeps them with the error on failure.
    pub fn finish_submit(&mut self, ticket: SubmitTicket, result: Result<Task>) -> Option<Task> {
        drop(ticket);
        match result {
            Ok(task) => {
                self.title.clear();
                self.description.clear();
                Some(task)
            }
            Err(error) => {
                tracing::warn!("Create task failed: {}", error);
                self.error = Some(error.to_string());
                None
            }
        }
    }

    pub async fn submit<A: TaskApi>(&mut self, api: &A) -> Option<Task> {
        let ticket = self.begin_submit()?;
        let result = api.create_task(&ticket.task).await;
        self.finish_submit(ticket, result)
    }
}
