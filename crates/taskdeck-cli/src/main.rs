//! Taskdeck CLI - manage your task list from the terminal

mod cli;
mod commands;
mod error;
mod token_store;


use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::AppContext;
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::show::run_show;
use crate::commands::toggle::run_toggle;
use crate::error::CliError;

const DEFAULT_LOG_DIRECTIVE: &str = "taskdeck=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if let Commands::Completions { shell, output } = &command {
        return run_completions(*shell, output.as_deref());
    }

    let context = AppContext::load(cli.api_url, cli.auth_url)?;

    match command {
        Commands::List { json } => run_list(&context, json).await?,
        Commands::Add { title, description } => run_add(&context, &title, description).await?,
        Commands::Show { id, json } => run_show(&context, &id, json).await?,
        Commands::Edit {
            id,
            title,
            description,
        } => run_edit(&context, &id, title, description).await?,
        Commands::Toggle { id } => run_toggle(&context, &id).await?,
        Commands::Delete { id, yes } => run_delete(&context, &id, yes).await?,
        Commands::Auth { command } => run_auth(&context, command).await?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}
