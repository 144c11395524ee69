use taskdeck_core::api::TaskApi;
use taskdeck_core::auth::TokenStore;
use taskdeck_core::dashboard::Dashboard;
use taskdeck_core::item::ItemEvent;
use taskdeck_core::{Task, TaskId};

use crate::commands::common::{confirm, find_item, parse_task_id, rejected_action, AppContext};
use crate::error::CliError;

pub async fn run_delete(context: &AppContext, id: &str, assume_yes: bool) -> Result<(), CliError> {
    let task_id = parse_task_id(id)?;
    let mut dashboard = context.dashboard().await?;
    let deleted = delete_task(&mut dashboard, task_id, |task| {
        assume_yes || confirm(&format!("Delete task {} \"{}\"?", task.id, task.title))
    })
    .await?;

    if deleted {
        println!("{task_id}");
    } else {
        println!("Cancelled");
    }
    Ok(())
}

/// Returns `false` when the confirmation was declined and nothing was sent.
pub async fn delete_task<A: TaskApi, S: TokenStore>(
    dashboard: &mut Dashboard<A, S>,
    id: TaskId,
    confirm: impl FnOnce(&Task) -> bool,
) -> Result<bool, CliError> {
    find_item(dashboard, id)?;
    let mut declined = false;
    let event = dashboard
        .delete(id, |task| {
            let accepted = confirm(task);
            declined = !accepted;
            accepted
        })
        .await?;

    match event {
        Some(ItemEvent::Deleted(_)) => Ok(true),
        _ if declined => Ok(false),
        _ => Err(rejected_action(dashboard, id)),
    }
}
