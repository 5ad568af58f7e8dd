//! Login, identity and logout commands.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::context::CliContext;
use crate::cli::display::{action_success, output, with_spinner, CommandOutput};
use crate::domain::models::UserInfo;
use crate::domain::ports::MajorApi;

#[derive(Debug, Serialize)]
pub struct LoginUrlOutput {
    pub url: String,
}

impl CommandOutput for LoginUrlOutput {
    fn to_human(&self) -> String {
        format!(
            "Open this URL in your browser to log in:\n\n  {}\n\nThen run `majorbracket callback --code <CODE> --state <STATE>`.",
            self.url
        )
    }
}

#[derive(Debug, Serialize)]
pub struct UserOutput {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub email: String,
    pub preferred_username: Option<String>,
}

impl From<&UserInfo> for UserOutput {
    fn from(user: &UserInfo) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            preferred_username: user.preferred_username.clone(),
        }
    }
}

impl CommandOutput for UserOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("User: {}", self.display_name.as_deref().unwrap_or(&self.name))];
        lines.push(format!("ID: {}", self.id));
        if !self.email.is_empty() {
            lines.push(format!("Email: {}", self.email));
        }
        if let Some(username) = &self.preferred_username {
            lines.push(format!("Username: {username}"));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct AuthActionOutput {
    pub success: bool,
    pub message: String,
    pub user: Option<UserOutput>,
}

impl CommandOutput for AuthActionOutput {
    fn to_human(&self) -> String {
        action_success(&self.message)
    }
}

pub async fn login(ctx: &CliContext, json_mode: bool) -> Result<()> {
    let url = with_spinner(json_mode, "Requesting login URL...", ctx.api.request_login_url())
        .await
        .context("Failed to request login URL")?;
    output(&LoginUrlOutput { url }, json_mode);
    Ok(())
}

/// Exchanges the code and stores the tokens. Any failure leaves no credentials behind.
pub async fn callback(ctx: &mut CliContext, code: &str, state: &str, json_mode: bool) -> Result<()> {
    let exchanged = with_spinner(json_mode, "Logging in...", async {
        let tokens = ctx.api.exchange_code(code, state).await?;
        let user = ctx.api.fetch_user_info(&tokens.access_token).await?;
        Ok::<_, crate::ClientError>((tokens, user))
    })
    .await;

    let (tokens, user) = match exchanged {
        Ok(pair) => pair,
        Err(err) => {
            ctx.auth.clear()?;
            return Err(err).context("Login failed");
        }
    };

    ctx.auth.save_login(&tokens, Some(user.clone()))?;
    tracing::info!(user_id = %user.id, "logged in");

    output(
        &AuthActionOutput {
            success: true,
            message: format!("Logged in as {}", user.label()),
            user: Some(UserOutput::from(&user)),
        },
        json_mode,
    );
    Ok(())
}

pub async fn whoami(ctx: &mut CliContext, json_mode: bool) -> Result<()> {
    let token = ctx.auth.access_token()?.to_string();
    let user = with_spinner(json_mode, "Fetching user info...", ctx.api.fetch_user_info(&token))
        .await?;
    ctx.auth.update_user(user.clone())?;
    output(&UserOutput::from(&user), json_mode);
    Ok(())
}

pub fn logout(ctx: &mut CliContext, json_mode: bool) -> Result<()> {
    ctx.auth.clear()?;
    output(
        &AuthActionOutput {
            success: true,
            message: "Logged out.".to_string(),
            user: None,
        },
        json_mode,
    );
    Ok(())
}
