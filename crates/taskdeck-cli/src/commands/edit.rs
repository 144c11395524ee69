use taskdeck_core::api::TaskApi;
use taskdeck_core::auth::TokenStore;
use taskdeck_core::dashboard::Dashboard;
use taskdeck_core::item::ItemEvent;
use taskdeck_core::{Task, TaskId};

use crate::commands::common::{
    capture_editor_input_with_initial, find_item, parse_editor_content, parse_task_id,
    rejected_action, render_editor_content, AppContext,
};
use crate::error::CliError;

pub async fn run_edit(
    context: &AppContext,
    id: &str,
    title: Option<String>,
    description: Option<String>,
) -> Result<(), CliError> {
    let task_id = parse_task_id(id)?;
    let mut dashboard = context.dashboard().await?;

    let (title, description) = if title.is_none() && description.is_none() {
        let current = find_item(&dashboard, task_id)?.task().clone();
        let current_description = current.description.clone().unwrap_or_default();
        let edited = capture_editor_input_with_initial(&render_editor_content(
            &current.title,
            &current_description,
        ))?;
        let Some((edited_title, edited_description)) = parse_editor_content(&edited) else {
            return Err(CliError::EmptyEditedContent);
        };
        if edited_title == current.title && edited_description == current_description {
            println!("{}", current.id);
            return Ok(());
        }
        (Some(edited_title), Some(edited_description))
    } else {
        (title, description)
    };

    let updated = edit_task(&mut dashboard, task_id, title, description).await?;
    println!("{}", updated.id);
    Ok(())
}

/// Drafts the given fields over the current values and saves them.
pub async fn edit_task<A: TaskApi, S: TokenStore>(
    dashboard: &mut Dashboard<A, S>,
    id: TaskId,
    title: Option<String>,
    description: Option<String>,
) -> Result<Task, CliError> {
    let item = dashboard.item_mut(id).map_err(|_| CliError::TaskNotFound(id.to_string()))?;
    if !item.start_edit() {
        return Err(CliError::TaskBusy(id.to_string()));
    }
    if let Some(title) = title {
        item.set_draft_title(title);
    }
    if let Some(description) = description {
        item.set_draft_description(description);
    }

    match dashboard.save(id).await? {
        Some(ItemEvent::Saved(task)) => Ok(task),
        _ => match dashboard.list().item(id) {
            // unchanged draft: nothing was sent
            Some(item) if !item.is_editing() && item.error().is_none() => {
                Ok(item.task().clone())
            }
            _ => Err(rejected_action(dashboard, id)),
        },
    }
}
