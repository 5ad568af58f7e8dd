//! Elimination rounds and their appearance history.

use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, Outcome};

/// Round lifecycle as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    #[default]
    Active,
    Completed,
}

impl RoundStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// One elimination stage over a fixed set of majors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based, increases by one per round
    pub round_number: u32,

    #[serde(default)]
    pub status: RoundStatus,

    /// Every major competing in this round, shown or not
    #[serde(default)]
    pub current_round_majors: Vec<String>,

    /// Candidates shown so far, in the order the server sent them
    #[serde(default)]
    pub appearances: Vec<Candidate>,
}

impl Round {
    pub fn new(round_number: u32, majors: Vec<String>) -> Self {
        Self {
            round_number,
            status: RoundStatus::Active,
            current_round_majors: majors,
            appearances: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RoundStatus::Active
    }

    pub fn appearance(&self, id: &str) -> Option<&Candidate> {
        self.appearances.iter().find(|c| c.id == id)
    }

    /// Inserts a candidate or, if its id already appeared, overwrites it in place.
    ///
    /// Returns `true` when a new appearance was appended.
    pub fn upsert_appearance(&mut self, candidate: Candidate) -> bool {
        if let Some(existing) = self.appearances.iter_mut().find(|c| c.id == candidate.id) {
            *existing = candidate;
            false
        } else {
            self.appearances.push(candidate);
            true
        }
    }

    /// Sets the outcome of an existing appearance. Unknown ids are ignored.
    pub fn set_outcome(&mut self, id: &str, outcome: Outcome) -> bool {
        match self.appearances.iter_mut().find(|c| c.id == id) {
            Some(candidate) => {
                candidate.outcome = outcome;
                true
            }
            None => false,
        }
    }

    /// Collapses duplicate ids: first position is kept, the last occurrence's data wins.
    #[must_use]
    pub fn normalized(self) -> Self {
        let Self {
            round_number,
            status,
            current_round_majors,
            appearances,
        } = self;
        let mut round = Self {
            round_number,
            status,
            current_round_majors,
            appearances: Vec::with_capacity(appearances.len()),
        };
        for candidate in appearances {
            round.upsert_appearance(candidate);
        }
        round
    }

    pub fn undecided(&self) -> impl Iterator<Item = &Candidate> {
        self.appearances
            .iter()
            .filter(|c| c.outcome == Outcome::Undecided)
    }
}
