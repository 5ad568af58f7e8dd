//! Candidate majors and the pairs they are compared in.

use serde::{Deserialize, Serialize};

/// Result of a candidate's comparison within its round.
///
/// On the wire this is `is_winner_in_comparison`: `null` while undecided,
/// `true` once advanced, `false` once eliminated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Outcome {
    #[default]
    Undecided,
    Advanced,
    Eliminated,
}

impl Outcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Undecided => "undecided",
            Self::Advanced => "advanced",
            Self::Eliminated => "eliminated",
        }
    }

    pub const fn is_decided(&self) -> bool {
        !matches!(self, Self::Undecided)
    }
}

impl From<Option<bool>> for Outcome {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Undecided,
            Some(true) => Self::Advanced,
            Some(false) => Self::Eliminated,
        }
    }
}

impl From<Outcome> for Option<bool> {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Undecided => None,
            Outcome::Advanced => Some(true),
            Outcome::Eliminated => Some(false),
        }
    }
}

/// A major as shown to the user within one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Opaque identifier assigned by the backend
    #[serde(rename = "major_id")]
    pub id: String,

    #[serde(rename = "major_name")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Position of this appearance within its round
    #[serde(default)]
    pub appearance_index: u32,

    #[serde(rename = "is_winner_in_comparison", default)]
    pub outcome: Outcome,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, appearance_index: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            appearance_index,
            outcome: Outcome::Undecided,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }
}

/// The two candidates of one comparison. Serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePair(pub Candidate, pub Candidate);

impl CandidatePair {
    pub const fn new(first: Candidate, second: Candidate) -> Self {
        Self(first, second)
    }

    pub fn first(&self) -> &Candidate {
        &self.0
    }

    pub fn second(&self) -> &Candidate {
        &self.1
    }

    pub fn ids(&self) -> [&str; 2] {
        [self.0.id.as_str(), self.1.id.as_str()]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.id == id || self.1.id == id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        [&self.0, &self.1].into_iter()
    }

    /// Returns `(winner, loser)` for the given winner id, or `None` if the id is not in the pair.
    pub fn split(&self, winner_id: &str) -> Option<(&Candidate, &Candidate)> {
        if self.0.id == winner_id {
            Some((&self.0, &self.1))
        } else if self.1.id == winner_id {
            Some((&self.1, &self.0))
        } else {
            None
        }
    }

    /// Both candidates still await a decision.
    pub fn is_unresolved(&self) -> bool {
        self.iter().all(|c| c.outcome == Outcome::Undecided)
    }
}

/// One side of a decided comparison as the submission endpoint expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorChoice {
    pub major_id: String,
    pub is_winner_in_comparison: bool,
}

/// Request body of the submission endpoint; `choices: null` asks the server for the next step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorChoiceRequest {
    pub choices: Option<[MajorChoice; 2]>,
}

impl MajorChoiceRequest {
    /// Builds the body for a decided pair, winner first.
    pub fn decided(pair: &CandidatePair, winner_id: &str) -> Option<Self> {
        let (winner, loser) = pair.split(winner_id)?;
        Some(Self {
            choices: Some([
                MajorChoice {
                    major_id: winner.id.clone(),
                    is_winner_in_comparison: true,
                },
                MajorChoice {
                    major_id: loser.id.clone(),
                    is_winner_in_comparison: false,
                },
            ]),
        })
    }

    pub const fn next_step() -> Self {
        Self { choices: None }
    }
}
