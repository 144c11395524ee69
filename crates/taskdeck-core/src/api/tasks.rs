//! Task endpoints layered on [`ApiClient::request`].

use std::future::Future;

use reqwest::Method;

use super::{ApiClient, AuthMode};
use crate::auth::TokenStore;
use crate::error::{Error, Result};
use crate::models::{NewTask, Task, TaskId, TaskPatch};

pub const TASKS_ENDPOINT: &str = "tasks/";

fn task_endpoint(id: TaskId) -> String {
    format!("tasks/{id}")
}

fn toggle_endpoint(id: TaskId) -> String {
    format!("tasks/{id}/toggle")
}

/// Task operations against the backend.
pub trait TaskApi: Send + Sync {
    /// `GET /tasks/`
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>>> + Send;

    /// `GET /tasks/{id}`
    fn get_task(&self, id: TaskId) -> impl Future<Output = Result<Task>> + Send;

    /// `POST /tasks/`
    fn create_task(&self, task: &NewTask) -> impl Future<Output = Result<Task>> + Send;

    /// `PUT /tasks/{id}` with only the fields present in `patch`
    fn update_task(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> impl Future<Output = Result<Task>> + Send;

    /// `PATCH /tasks/{id}/toggle`; the server inverts `completed`
    fn toggle_task(&self, id: TaskId) -> impl Future<Output = Result<Task>> + Send;

    /// `DELETE /tasks/{id}`
    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<()>> + Send;
}

impl<S: TokenStore> ApiClient<S> {
    async fn expect_task(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Task> {
        let label = format!("{method} {endpoint}");
        self.request::<Task>(method, endpoint, body, AuthMode::Required)
            .await?
            .ok_or(Error::EmptyResponse(label))
    }
}

impl<S: TokenStore> TaskApi for ApiClient<S> {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let tasks = self
            .request::<Vec<Task>>(Method::GET, TASKS_ENDPOINT, None, AuthMode::Required)
            .await?
            .unwrap_or_default();
        tracing::debug!(count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    async fn get_task(&self, id: TaskId) -> Result<Task> {
        self.expect_task(Method::GET, &task_endpoint(id), None).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        let body = serde_json::to_value(task)?;
        self.expect_task(Method::POST, TASKS_ENDPOINT, Some(&body))
            .await
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let body = serde_json::to_value(patch)?;
        self.expect_task(Method::PUT, &task_endpoint(id), Some(&body))
            .await
    }

    async fn toggle_task(&self, id: TaskId) -> Result<Task> {
        self.expect_task(Method::PATCH, &toggle_endpoint(id), None)
            .await
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.request::<serde_json::Value>(
            Method::DELETE,
            &task_endpoint(id),
            None,
            AuthMode::Required,
        )
        .await?;
        Ok(())
    }
}
