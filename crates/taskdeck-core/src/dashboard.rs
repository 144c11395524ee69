//! Signed-in task dashboard.
//!
//! Gates everything on the stored token, loads the task collection, and routes
//! item events back into a refetch or an in-place patch.

use crate::api::TaskApi;
use crate::auth::TokenStore;
use crate::error::{Error, Result};
use crate::form::TaskForm;
use crate::item::{ItemEvent, TaskItem};
use crate::list::{ListAction, TaskList};
use crate::models::{Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Loading,
    /// No usable session; the caller should send the user to login
    RedirectToLogin,
    /// Load failed for a reason other than authentication
    Failed { message: String },
    Ready,
}

#[derive(Debug)]
pub struct Dashboard<A, S> {
    api: A,
    tokens: S,
    state: DashboardState,
    list: TaskList,
    form: TaskForm,
}

impl<A: TaskApi, S: TokenStore> Dashboard<A, S> {
    pub fn new(api: A, tokens: S) -> Self {
        Self {
            api,
            tokens,
            state: DashboardState::Loading,
            list: TaskList::default(),
            form: TaskForm::new(),
        }
    }

    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    pub const fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut TaskList {
        &mut self.list
    }

    pub const fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TaskForm {
        &mut self.form
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Redirects without any request when signed out, otherwise loads once.
    pub async fn mount(&mut self) -> &DashboardState {
        if !self.tokens.is_authenticated() {
            tracing::info!("No stored session, redirecting to login");
            self.state = DashboardState::RedirectToLogin;
            return &self.state;
        }
        self.refresh().await
    }

    /// Refetches the whole collection.
    pub async fn refresh(&mut self) -> &DashboardState {
        self.state = DashboardState::Loading;
        match self.api.list_tasks().await {
            Ok(tasks) => {
                self.list.set_tasks(tasks);
                self.state = DashboardState::Ready;
            }
            Err(error) if error.is_auth_failure() => {
                tracing::warn!("Session rejected while loading tasks: {}", error);
                self.list.set_tasks(Vec::new());
                self.state = DashboardState::RedirectToLogin;
            }
            Err(error) => {
                tracing::warn!("Failed to load tasks: {}", error);
                self.state = DashboardState::Failed {
                    message: error.to_string(),
                };
            }
        }
        &self.state
    }

    /// Clears the session and redirects to login.
    pub fn logout(&mut self) -> Result<()> {
        self.tokens.clear()?;
        self.list.set_tasks(Vec::new());
        self.state = DashboardState::RedirectToLogin;
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn item(&self, id: TaskId) -> Result<&TaskItem> {
        self.list.item(id).ok_or_else(|| missing_task(id))
    }

    pub fn item_mut(&mut self, id: TaskId) -> Result<&mut TaskItem> {
        self.list.item_mut(id).ok_or_else(|| missing_task(id))
    }

    pub async fn toggle(&mut self, id: TaskId) -> Result<Option<ItemEvent>> {
        let item = self.list.item_mut(id).ok_or_else(|| missing_task(id))?;
        let event = item.toggle(&self.api).await;
        self.settle(event.clone()).await;
        Ok(event)
    }

    /// Saves the item's current draft.
    pub async fn save(&mut self, id: TaskId) -> Result<Option<ItemEvent>> {
        let item = self.list.item_mut(id).ok_or_else(|| missing_task(id))?;
        let event = item.save(&self.api).await;
        self.settle(event.clone()).await;
        Ok(event)
    }

    pub async fn delete(
        &mut self,
        id: TaskId,
        confirm: impl FnOnce(&Task) -> bool,
    ) -> Result<Option<ItemEvent>> {
        let item = self.list.item_mut(id).ok_or_else(|| missing_task(id))?;
        let event = item.delete(&self.api, confirm).await;
        self.settle(event.clone()).await;
        Ok(event)
    }

    /// Submits the creation form and refetches on success.
    pub async fn create(&mut self) -> Option<Task> {
        let created = self.form.submit(&self.api).await?;
        self.refresh().await;
        Some(created)
    }

    async fn settle(&mut self, event: Option<ItemEvent>) {
        let Some(event) = event else {
            return;
        };
        if self.list.apply(event) == ListAction::Refresh {
            self.refresh().await;
        }
    }
}

fn missing_task(id: TaskId) -> Error {
    Error::InvalidInput(format!("Task {id} is not in the current list"))
}
