//! In-process backend double used by the state machine tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::TaskApi;
use crate::error::{Error, Result};
use crate::models::{NewTask, Task, TaskId, TaskPatch};

pub fn task(id: i64, title: &str, completed: bool) -> Task {
    Task {
        id: TaskId::new(id),
        title: title.to_string(),
        description: None,
        completed,
        owner_id: Some(1),
    }
}

#[derive(Debug, Default)]
pub struct FakeTaskApi {
    tasks: Mutex<Vec<Task>>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, (u16, String)>>,
}

impl FakeTaskApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Self::default()
        }
    }

    /// Makes every call of `operation` fail until cleared.
    pub fn fail(&self, operation: &'static str, status: u16, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, (status, message.to_string()));
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn server_tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, id: Option<TaskId>) -> Result<()> {
        let label = id.map_or_else(|| operation.to_string(), |id| format!("{operation} {id}"));
        self.calls.lock().unwrap().push(label);
        if let Some((status, message)) = self.failures.lock().unwrap().get(operation) {
            return Err(Error::Api {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(())
    }

    fn with_task<T>(&self, id: TaskId, apply: impl FnOnce(&mut Task) -> T) -> Result<T> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::Api {
                status: 404,
                message: "Task not found".to_string(),
            })?;
        Ok(apply(task))
    }
}

impl TaskApi for FakeTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.record("list", None)?;
        Ok(self.server_tasks())
    }

    async fn get_task(&self, id: TaskId) -> Result<Task> {
        self.record("get", Some(id))?;
        self.with_task(id, |task| task.clone())
    }

    async fn create_task(&self, new_task: &NewTask) -> Result<Task> {
        self.record("create", None)?;
        let mut tasks = self.tasks.lock().unwrap();
        let next_id = tasks.iter().map(|task| task.id.get()).max().unwrap_or(0) + 1;
        let task = Task {
            id: TaskId::new(next_id),
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            completed: false,
            owner_id: Some(1),
        };
        tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        self.record("update", Some(id))?;
        if patch.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            return Err(Error::Api {
                status: 422,
                message: "Title must not be empty".to_string(),
            });
        }
        self.with_task(id, |task| {
            if let Some(title) = &patch.title {
                task.title.clone_from(title);
            }
            if let Some(description) = &patch.description {
                task.description = Some(description.clone());
            }
            if let Some(completed) = patch.completed {
                task.completed = completed;
            }
            task.clone()
        })
    }

    async fn toggle_task(&self, id: TaskId) -> Result<Task> {
        self.record("toggle", Some(id))?;
        self.with_task(id, |task| {
            task.completed = !task.completed;
            task.clone()
        })
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.record("delete", Some(id))?;
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Err(Error::Api {
                status: 404,
                message: "Task not found".to_string(),
            });
        }
        Ok(())
    }
}
