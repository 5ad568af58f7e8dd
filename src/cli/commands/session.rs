//! Session CLI commands: create, list, inspect and play.

use anyhow::{bail, Context, Result};
use console::{style, Term};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::cli::context::CliContext;
use crate::cli::display::{
    action_success, colorize_outcome, colorize_round_status, heading, list_table, output,
    render_list, truncate, with_spinner, CommandOutput,
};
use crate::domain::models::{BaseInformation, CandidatePair};
use crate::domain::ports::MajorApi;
use crate::infrastructure::api::HttpMajorApi;
use crate::services::{render_report_markdown, SessionController, SessionView};

#[derive(Debug, Serialize)]
pub struct SessionCreatedOutput {
    pub session_id: String,
}

impl CommandOutput for SessionCreatedOutput {
    fn to_human(&self) -> String {
        format!(
            "{}\nRun `majorbracket play {}` to start comparing majors.",
            action_success(&format!("Session created: {}", self.session_id)),
            self.session_id
        )
    }
}

#[derive(Debug, Serialize)]
pub struct SessionListOutput {
    pub sessions: Vec<String>,
    pub total: usize,
}

impl CommandOutput for SessionListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["#", "session id"]);
        for (index, id) in self.sessions.iter().enumerate() {
            table.add_row(vec![format!("Session #{}", index + 1), id.clone()]);
        }
        render_list("session", &table, self.total)
    }
}

#[derive(Debug, Serialize)]
pub struct SessionViewOutput {
    #[serde(flatten)]
    pub view: SessionView,
}

impl CommandOutput for SessionViewOutput {
    fn to_human(&self) -> String {
        render_view(&self.view)
    }
}

fn join_names(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        truncate(&names.join(", "), 60)
    }
}

fn render_pair(pair: &CandidatePair) -> String {
    let mut lines = vec![heading("Current comparison").to_string()];
    for (index, candidate) in pair.iter().enumerate() {
        lines.push(format!(
            "  {}) {} {}",
            index + 1,
            style(&candidate.name).bold(),
            style(format!("[{}]", candidate.id)).dim()
        ));
        if !candidate.description.is_empty() {
            lines.push(format!("     {}", candidate.description));
        }
    }
    lines.join("\n")
}

/// Human rendering of a whole session: round table, pending pair, report.
pub fn render_view(view: &SessionView) -> String {
    let mut sections = vec![format!("Session: {}", view.session_id)];

    if view.rounds.is_empty() {
        sections.push("No rounds yet.".to_string());
    } else {
        let mut table = list_table(&["round", "status", "advanced", "eliminated", "pending"]);
        for round in &view.rounds {
            table.add_row(vec![
                format!("Round {}", round.round_number),
                colorize_round_status(round.status, round.is_active).to_string(),
                join_names(&round.advanced),
                join_names(&round.eliminated),
                join_names(&round.pending),
            ]);
        }
        sections.push(table.to_string());

        if let Some(active) = view.rounds.iter().find(|r| r.is_active) {
            let majors: Vec<String> = active
                .all_majors
                .iter()
                .map(|m| colorize_outcome(&m.name, m.outcome).to_string())
                .collect();
            sections.push(format!(
                "Majors in round {}: {}",
                active.round_number,
                majors.join(", ")
            ));
        }
    }

    if let Some(pair) = &view.pending {
        sections.push(render_pair(pair));
    }

    if let Some(report) = &view.report {
        sections.push(render_report_markdown(report));
    } else if view.finished {
        let name = view.final_major_name.as_deref().unwrap_or("unknown");
        sections.push(format!("Session finished. Final major: {name}"));
    }

    sections.join("\n\n")
}

fn read_answers(path: &Path) -> Result<BaseInformation> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("Answers file {} is not valid YAML or JSON", path.display()))
}

async fn open_session(
    ctx: &CliContext,
    id: &str,
    json_mode: bool,
) -> Result<SessionController<HttpMajorApi>> {
    let token = ctx.auth.access_token()?.to_string();
    let controller = with_spinner(
        json_mode,
        "Loading session...",
        SessionController::open(Arc::clone(&ctx.api), token, id),
    )
    .await?;
    Ok(controller)
}

pub async fn start(ctx: &CliContext, answers: &Path, json_mode: bool) -> Result<()> {
    let info = read_answers(answers)?;
    let token = ctx.auth.access_token()?;
    let session_id = with_spinner(
        json_mode,
        "Creating session...",
        ctx.api.submit_base_information(&info, token),
    )
    .await?;

    tracing::info!(session_id = %session_id, "session created");
    output(&SessionCreatedOutput { session_id }, json_mode);
    Ok(())
}

pub async fn list(ctx: &CliContext, json_mode: bool) -> Result<()> {
    let token = ctx.auth.access_token()?;
    let sessions = with_spinner(json_mode, "Loading sessions...", ctx.api.fetch_session_ids(token))
        .await?;
    output(
        &SessionListOutput {
            total: sessions.len(),
            sessions,
        },
        json_mode,
    );
    Ok(())
}

pub async fn show(ctx: &CliContext, id: &str, json_mode: bool) -> Result<()> {
    let controller = open_session(ctx, id, json_mode).await?;
    output(&SessionViewOutput { view: controller.view() }, json_mode);
    Ok(())
}

pub async fn choose(ctx: &CliContext, id: &str, major_id: &str, json_mode: bool) -> Result<()> {
    let mut controller = open_session(ctx, id, json_mode).await?;
    with_spinner(json_mode, "Submitting choice...", controller.select_candidate(major_id)).await?;
    output(&SessionViewOutput { view: controller.view() }, json_mode);
    Ok(())
}

/// Interactive loop. Failed submissions print a notice and keep the pair selectable.
pub async fn play(ctx: &CliContext, id: &str, json_mode: bool) -> Result<()> {
    if json_mode {
        bail!("`play` is interactive; use `show` and `choose` with --json");
    }

    let term = Term::stdout();
    let mut controller = open_session(ctx, id, json_mode).await?;

    loop {
        let view = controller.view();
        if view.finished {
            println!("{}", render_view(&view));
            break;
        }

        let Some(pair) = view.pending.clone() else {
            println!("{}", render_view(&view));
            term.write_str("No comparison pending. Press Enter to continue or q to quit: ")?;
            if term.read_line()?.trim().eq_ignore_ascii_case("q") {
                break;
            }
            let requested =
                with_spinner(false, "Requesting next comparison...", controller.request_next())
                    .await;
            match requested {
                Ok(()) => {}
                Err(err) if err.requires_logout() => return Err(err.into()),
                Err(err) => println!("{} {err}", style("!").yellow().bold()),
            }
            continue;
        };

        println!("{}", render_view(&view));
        term.write_str("Choose 1 or 2 (q to quit): ")?;
        let winner = match term.read_line()?.trim() {
            "1" => pair.first().id.clone(),
            "2" => pair.second().id.clone(),
            "q" | "Q" => break,
            other => {
                println!("{} {other:?} is not an option", style("!").yellow().bold());
                continue;
            }
        };

        let result = with_spinner(false, "Submitting choice...", controller.select_candidate(&winner))
            .await;
        match result {
            Ok(()) => {}
            Err(err) if err.requires_logout() => return Err(err.into()),
            Err(err) => println!("{} {err}", style("!").yellow().bold()),
        }
    }

    Ok(())
}
