use taskdeck_core::api::TaskApi;

use crate::commands::common::{format_task_details, parse_task_id, AppContext};
use crate::error::CliError;

pub async fn run_show(context: &AppContext, id: &str, as_json: bool) -> Result<(), CliError> {
    let task_id = parse_task_id(id)?;
    let dashboard = context.dashboard().await?;
    let task = dashboard.api().get_task(task_id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        for line in format_task_details(&task) {
            println!("{line}");
        }
    }
    Ok(())
}
