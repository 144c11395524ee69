use taskdeck_core::api::TaskApi;
use taskdeck_core::auth::TokenStore;
use taskdeck_core::dashboard::Dashboard;
use taskdeck_core::Task;

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_add(
    context: &AppContext,
    title_parts: &[String],
    description: Option<String>,
) -> Result<(), CliError> {
    let mut dashboard = context.dashboard().await?;
    let task = add_task(&mut dashboard, &title_parts.join(" "), description).await?;
    println!("{}", task.id);
    Ok(())
}

/// Submits the creation form; the backend decides whether the title is acceptable.
pub async fn add_task<A: TaskApi, S: TokenStore>(
    dashboard: &mut Dashboard<A, S>,
    title: &str,
    description: Option<String>,
) -> Result<Task, CliError> {
    let form = dashboard.form_mut();
    form.set_title(title);
    form.set_description(description.unwrap_or_default());

    match dashboard.create().await {
        Some(task) => Ok(task),
        None => Err(CliError::Rejected(
            dashboard
                .form()
                .error()
                .unwrap_or("Task was not created")
                .to_string(),
        )),
    }
}
