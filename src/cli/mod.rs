//! Command-line interface: the terminal rendering layer over the services.

pub mod commands;
pub mod context;
pub mod display;
pub mod types;

use anyhow::Result;
use serde_json::json;

pub use context::CliContext;
pub use types::{Cli, Commands};

use crate::domain::errors::ClientError;
use crate::infrastructure::credentials::AuthContext;

/// Runs one parsed command.
///
/// # Errors
/// Whatever the command fails with; pass it to [`handle_error`].
pub async fn run(command: Commands, ctx: &mut CliContext, json_mode: bool) -> Result<()> {
    match command {
        Commands::Login => commands::auth::login(ctx, json_mode).await,
        Commands::Callback { code, state } => {
            commands::auth::callback(ctx, &code, &state, json_mode).await
        }
        Commands::Whoami => commands::auth::whoami(ctx, json_mode).await,
        Commands::Logout => commands::auth::logout(ctx, json_mode),
        Commands::Start { answers } => commands::session::start(ctx, &answers, json_mode).await,
        Commands::Sessions => commands::session::list(ctx, json_mode).await,
        Commands::Show { id } => commands::session::show(ctx, &id, json_mode).await,
        Commands::Choose { id, major_id } => {
            commands::session::choose(ctx, &id, &major_id, json_mode).await
        }
        Commands::Play { id } => commands::session::play(ctx, &id, json_mode).await,
    }
}

/// Prints a failed command's error. Authentication failures also clear the
/// stored credentials, since the token can no longer be used.
pub fn handle_error(err: &anyhow::Error, json_mode: bool, auth: Option<&mut AuthContext>) {
    let client_error = err.downcast_ref::<ClientError>();
    let logged_out = match (client_error, auth) {
        (Some(client_error), Some(auth)) if client_error.requires_logout() => {
            if let Err(clear_err) = auth.clear() {
                tracing::warn!(error = %clear_err, "failed to clear stored credentials");
            }
            true
        }
        _ => false,
    };

    if json_mode {
        let body = json!({
            "error": {
                "kind": client_error.map_or("other", ClientError::kind),
                "message": format!("{err:#}"),
                "missing_fields": match client_error {
                    Some(ClientError::Validation { missing_fields }) => json!(missing_fields),
                    _ => serde_json::Value::Null,
                },
                "logged_out": logged_out,
            }
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
        if logged_out {
            eprintln!("Your session has expired. Run `majorbracket login` to log in again.");
        } else if client_error.is_some_and(ClientError::is_retryable) {
            eprintln!("The server could not be reached. Try again.");
        }
    }
}
