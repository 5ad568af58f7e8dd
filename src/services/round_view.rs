//! Round presentation adapter.
//!
//! Pure derivations over a [`Round`] used by every renderer. Identical input
//! always yields identical output.

use regex::Regex;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::LazyLock;

use crate::domain::models::{CandidatePair, FinalReport, Outcome, Round, RoundStatus};

static LEADING_INDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?: {4}|\t)+").expect("valid indent regex"));

/// Names of appearances that won their comparison, in insertion order.
pub fn advanced_names(round: &Round) -> Vec<String> {
    names_with(round, Outcome::Advanced)
}

/// Names of appearances that lost their comparison, in insertion order.
pub fn eliminated_names(round: &Round) -> Vec<String> {
    names_with(round, Outcome::Eliminated)
}

fn names_with(round: &Round, outcome: Outcome) -> Vec<String> {
    round
        .appearances
        .iter()
        .filter(|c| c.outcome == outcome)
        .map(|c| c.name.clone())
        .collect()
}

/// Majors of the round that have no decided outcome yet, including those never shown.
pub fn pending_names(round: &Round) -> Vec<String> {
    round
        .current_round_majors
        .iter()
        .filter(|name| {
            !round
                .appearances
                .iter()
                .any(|c| &c.name == *name && c.outcome.is_decided())
        })
        .cloned()
        .collect()
}

/// The comparison to offer for this round.
///
/// Prefers the pair recoverable from the round itself (exactly two undecided
/// appearances), then the externally known latest pair. Inactive rounds never
/// offer a pair.
pub fn active_pair(
    round: &Round,
    is_active: bool,
    latest: Option<&CandidatePair>,
) -> Option<CandidatePair> {
    if !is_active {
        return None;
    }
    let mut undecided = round.undecided();
    match (undecided.next(), undecided.next(), undecided.next()) {
        (Some(first), Some(second), None) => {
            Some(CandidatePair::new(first.clone(), second.clone()))
        }
        _ => latest.cloned(),
    }
}

/// One major of a round together with its current outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MajorEntry {
    pub name: String,
    pub outcome: Outcome,
}

/// Everything a renderer needs to draw one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round_number: u32,
    pub status: RoundStatus,
    pub is_active: bool,
    pub advanced: Vec<String>,
    pub eliminated: Vec<String>,
    pub pending: Vec<String>,
    pub active_pair: Option<CandidatePair>,
    /// Round majors first, then any appearance not listed among them
    pub all_majors: Vec<MajorEntry>,
}

impl RoundSummary {
    pub fn from_round(round: &Round, is_active: bool, latest: Option<&CandidatePair>) -> Self {
        let outcome_of = |name: &str| {
            round
                .appearances
                .iter()
                .filter(|c| c.name == name)
                .map(|c| c.outcome)
                .find(Outcome::is_decided)
                .unwrap_or_default()
        };

        let mut all_majors: Vec<MajorEntry> = round
            .current_round_majors
            .iter()
            .map(|name| MajorEntry {
                name: name.clone(),
                outcome: outcome_of(name),
            })
            .collect();
        for candidate in &round.appearances {
            if !all_majors.iter().any(|m| m.name == candidate.name) {
                all_majors.push(MajorEntry {
                    name: candidate.name.clone(),
                    outcome: outcome_of(&candidate.name),
                });
            }
        }

        Self {
            round_number: round.round_number,
            status: round.status,
            is_active,
            advanced: advanced_names(round),
            eliminated: eliminated_names(round),
            pending: pending_names(round),
            active_pair: active_pair(round, is_active, latest),
            all_majors,
        }
    }
}

/// Strips indentation and code fences so the text renders as prose.
pub fn sanitize_recommendation(text: &str) -> String {
    LEADING_INDENT.replace_all(text, "").replace("```", "")
}

/// Renders the final report as Markdown.
pub fn render_report_markdown(report: &FinalReport) -> String {
    let mut out = String::from("### Final three majors\n");
    for (major, narrative) in report.finalists() {
        let _ = write!(out, "\n#### {major}\n");
        if !narrative.trim().is_empty() {
            let _ = writeln!(out, "\n{}", narrative.trim());
        }
    }
    let _ = write!(
        out,
        "\n### Final recommendation\n\n{}\n",
        sanitize_recommendation(&report.final_recommendation).trim()
    );
    out
}
