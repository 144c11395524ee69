use taskdeck_core::api::TaskApi;
use taskdeck_core::auth::TokenStore;
use taskdeck_core::dashboard::Dashboard;
use taskdeck_core::item::ItemEvent;
use taskdeck_core::{Task, TaskId};

use crate::commands::common::{
    completion_marker, find_item, parse_task_id, rejected_action, AppContext,
};
use crate::error::CliError;

pub async fn run_toggle(context: &AppContext, id: &str) -> Result<(), CliError> {
    let task_id = parse_task_id(id)?;
    let mut dashboard = context.dashboard().await?;
    let task = toggle_task(&mut dashboard, task_id).await?;
    println!(
        "{} {}  {}",
        completion_marker(task.completed),
        task.id,
        task.title
    );
    Ok(())
}

pub async fn toggle_task<A: TaskApi, S: TokenStore>(
    dashboard: &mut Dashboard<A, S>,
    id: TaskId,
) -> Result<Task, CliError> {
    find_item(dashboard, id)?;
    match dashboard.toggle(id).await? {
        Some(ItemEvent::Toggled(task)) => Ok(task),
        _ => Err(rejected_action(dashboard, id)),
    }
}
