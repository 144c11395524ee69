use taskdeck_core::api::TaskApi;
use taskdeck_core::auth::TokenStore;
use taskdeck_core::dashboard::Dashboard;
use taskdeck_core::list::ListView;
use taskdeck_core::Task;

use crate::commands::common::{format_task_line, AppContext};
use crate::error::CliError;

pub const EMPTY_LIST_MESSAGE: &str = "No tasks yet. Add one with `taskdeck add <title>`.";

pub async fn run_list(context: &AppContext, as_json: bool) -> Result<(), CliError> {
    let dashboard = context.dashboard().await?;

    if as_json {
        let tasks = dashboard.list().tasks().collect::<Vec<&Task>>();
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        for line in render_list(&dashboard) {
            println!("{line}");
        }
    }

    Ok(())
}

pub fn render_list<A: TaskApi, S: TokenStore>(dashboard: &Dashboard<A, S>) -> Vec<String> {
    match dashboard.list().view() {
        ListView::Empty => vec![EMPTY_LIST_MESSAGE.to_string()],
        ListView::Items(views) => views.iter().map(format_task_line).collect(),
    }
}
