//! Outcome and status color mapping for CLI output.
//!
//! `console` drops styling automatically when stdout is not a terminal.

use console::{style, StyledObject};

use crate::domain::models::{Outcome, RoundStatus};

/// Green for majors that advanced, dim red for eliminated ones.
pub fn colorize_outcome(name: &str, outcome: Outcome) -> StyledObject<&str> {
    match outcome {
        Outcome::Advanced => style(name).green(),
        Outcome::Eliminated => style(name).red().dim(),
        Outcome::Undecided => style(name),
    }
}

pub fn colorize_round_status(status: RoundStatus, is_active: bool) -> StyledObject<&'static str> {
    match (status, is_active) {
        (_, true) => style("active").yellow().bold(),
        (RoundStatus::Completed, false) => style("completed").green(),
        (RoundStatus::Active, false) => style("inactive").dim(),
    }
}

pub fn heading(text: &str) -> StyledObject<&str> {
    style(text).bold().underlined()
}
