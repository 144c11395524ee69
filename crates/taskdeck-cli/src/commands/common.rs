use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use taskdeck_core::api::{ApiClient, TaskApi};
use taskdeck_core::auth::{IdentityClient, TokenStore};
use taskdeck_core::config::ClientConfig;
use taskdeck_core::dashboard::{Dashboard, DashboardState};
use taskdeck_core::item::{ItemView, TaskItem};
use taskdeck_core::{Task, TaskId};

use crate::error::CliError;
use crate::token_store::{default_token_store, CliTokenStore};

/// Resolved endpoints plus the session token store for one invocation.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub tokens: CliTokenStore,
}

impl AppContext {
    pub fn load(api_url: Option<String>, auth_url: Option<String>) -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?.with_overrides(api_url, auth_url)?;
        tracing::debug!(
            api = %config.api_base_url,
            auth = %config.auth_base_url,
            "Resolved client configuration"
        );
        Ok(Self {
            config,
            tokens: default_token_store()?,
        })
    }

    pub fn api_client(&self) -> Result<ApiClient<CliTokenStore>, CliError> {
        Ok(ApiClient::from_config(&self.config, self.tokens.clone())?)
    }

    pub fn identity_client(&self) -> Result<IdentityClient<CliTokenStore>, CliError> {
        Ok(IdentityClient::new(
            &self.config.auth_base_url,
            self.api_client()?,
        )?)
    }

    /// Mounts the dashboard and requires it to reach the ready state.
    pub async fn dashboard(
        &self,
    ) -> Result<Dashboard<ApiClient<CliTokenStore>, CliTokenStore>, CliError> {
        let dashboard = Dashboard::new(self.api_client()?, self.tokens.clone());
        ready_dashboard(dashboard).await
    }
}

pub async fn ready_dashboard<A: TaskApi, S: TokenStore>(
    mut dashboard: Dashboard<A, S>,
) -> Result<Dashboard<A, S>, CliError> {
    let state = dashboard.mount().await.clone();
    match state {
        DashboardState::Ready => Ok(dashboard),
        DashboardState::RedirectToLogin => Err(CliError::NotSignedIn),
        DashboardState::Failed { message } => Err(CliError::LoadFailed(message)),
        DashboardState::Loading => Err(CliError::LoadFailed(
            "task list did not finish loading".to_string(),
        )),
    }
}

pub fn parse_task_id(id: &str) -> Result<TaskId, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyTaskId);
    }
    trimmed
        .parse::<TaskId>()
        .map_err(|_| CliError::InvalidTaskId(trimmed.to_string()))
}

/// Looks an id up in the loaded list.
pub fn find_item<A: TaskApi, S: TokenStore>(
    dashboard: &Dashboard<A, S>,
    id: TaskId,
) -> Result<&TaskItem, CliError> {
    dashboard
        .list()
        .item(id)
        .ok_or_else(|| CliError::TaskNotFound(id.to_string()))
}

/// Error for an item action that produced no event.
pub fn rejected_action<A: TaskApi, S: TokenStore>(
    dashboard: &Dashboard<A, S>,
    id: TaskId,
) -> CliError {
    match dashboard.list().item(id) {
        Some(item) => item.error().map_or_else(
            || CliError::TaskBusy(id.to_string()),
            |message| CliError::Rejected(message.to_string()),
        ),
        None => CliError::TaskNotFound(id.to_string()),
    }
}

pub const fn completion_marker(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn format_task_line(view: &ItemView) -> String {
    let marker = completion_marker(view.completed);
    let id = view.id.to_string();
    match view.description.as_deref() {
        Some(description) => format!(
            "{marker} {id:>5}  {}  - {}",
            view.title,
            task_preview(description, 60)
        ),
        None => format!("{marker} {id:>5}  {}", view.title),
    }
}

pub fn format_task_details(task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!("ID:          {}", task.id),
        format!("Title:       {}", task.title),
        format!(
            "Status:      {}",
            if task.completed { "done" } else { "pending" }
        ),
    ];
    if let Some(description) = task.description_text() {
        lines.push(format!("Description: {description}"));
    }
    lines
}

pub fn task_preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

/// Asks `prompt` on the terminal; anything but `y`/`yes` declines.
pub fn confirm(prompt: &str) -> bool {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        tracing::debug!("No terminal for confirmation, declining");
        return false;
    }

    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if stdin.lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_affirmative(&answer)
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Editor buffer layout: title on the first line, description after a blank line.
pub fn render_editor_content(title: &str, description: &str) -> String {
    if description.is_empty() {
        format!("{title}\n")
    } else {
        format!("{title}\n\n{description}\n")
    }
}

/// Splits an editor buffer back into title and description.
pub fn parse_editor_content(content: &str) -> Option<(String, String)> {
    if content.trim().is_empty() {
        return None;
    }
    let mut lines = content.lines();
    let title = lines.next().unwrap_or_default().trim().to_string();
    let description = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    Some((title, description))
}

pub fn capture_editor_input_with_initial(initial_content: &str) -> Result<String, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_task_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(content)
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let status = Command::new(program).args(parts).arg(file_path).status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn create_temp_task_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("taskdeck-task-{}-{now}.txt", std::process::id()))
}
