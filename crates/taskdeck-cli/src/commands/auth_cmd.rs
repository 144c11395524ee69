use taskdeck_core::auth::{AuthToken, TokenStore};

use crate::cli::AuthCommands;
use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_auth(context: &AppContext, command: AuthCommands) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { email, password } => {
            let identity = context.identity_client()?;
            let (_, user) = identity.login(&email, &password).await?;
            let email_label = user.email.as_deref().unwrap_or(email.trim());
            println!("Signed in as {email_label}");
            Ok(())
        }
        AuthCommands::Signup { email, password } => {
            let identity = context.identity_client()?;
            let (_, user) = identity.signup(&email, &password).await?;
            let email_label = user.email.as_deref().unwrap_or(email.trim());
            println!("Signed up and signed in as {email_label}");
            Ok(())
        }
        AuthCommands::SetToken { token } => {
            store_token(&context.tokens, &token)?;
            println!("Session token stored");
            Ok(())
        }
        AuthCommands::Status => {
            println!("{}", status_line(&context.tokens)?);
            Ok(())
        }
        AuthCommands::Logout => {
            context.tokens.clear()?;
            println!("Signed out");
            Ok(())
        }
    }
}

pub fn store_token<S: TokenStore>(tokens: &S, raw: &str) -> Result<(), CliError> {
    let token = AuthToken::new(raw).ok_or(CliError::EmptyToken)?;
    tokens.save(&token)?;
    Ok(())
}

pub fn status_line<S: TokenStore>(tokens: &S) -> Result<String, CliError> {
    Ok(if tokens.load()?.is_some() {
        "Signed in (session token stored)".to_string()
    } else {
        "Not signed in.".to_string()
    })
}
