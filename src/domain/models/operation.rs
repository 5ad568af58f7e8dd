//! Tagged result of the save-and-next endpoint.

use serde::{Deserialize, Serialize};

use super::candidate::CandidatePair;
use super::report::FinalReport;
use crate::domain::errors::{ClientError, ClientResult};

/// What the server decided to do after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Another comparison within the current round
    MoreChoices(CandidatePair),
    /// A new round started, seeded with its first comparison
    NewRound {
        number: u32,
        majors: Vec<String>,
        pair: CandidatePair,
    },
    /// The tournament is over
    Report(FinalReport),
}

impl OperationResult {
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::MoreChoices(_) => OperationKind::GenerateChoices,
            Self::NewRound { .. } => OperationKind::GenerateRound,
            Self::Report(_) => OperationKind::GenerateReport,
        }
    }
}

/// The `operation` tag of the wire envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    GenerateChoices,
    GenerateRound,
    GenerateReport,
}

impl OperationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GenerateChoices => "GENERATE_CHOICES",
            Self::GenerateRound => "GENERATE_ROUND",
            Self::GenerateReport => "GENERATE_REPORT",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChoicesPayload {
    choices: CandidatePair,
}

#[derive(Debug, Deserialize)]
struct RoundPayload {
    current_round_number: u32,
    #[serde(default)]
    current_round_majors: Vec<String>,
    choices: CandidatePair,
}

/// Wire envelope: `{status, operation, data}` with `data` shaped by `operation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationEnvelope {
    pub status: String,
    pub operation: OperationKind,
    pub data: serde_json::Value,
}

impl OperationEnvelope {
    /// Decodes `data` according to the tag. A non-success status or a payload
    /// that does not match its tag is an inconsistent response.
    pub fn into_result(self) -> ClientResult<OperationResult> {
        if self.status != "success" {
            return Err(ClientError::InconsistentState(format!(
                "{} returned status '{}'",
                self.operation.as_str(),
                self.status
            )));
        }

        match self.operation {
            OperationKind::GenerateChoices => {
                let payload: ChoicesPayload = serde_json::from_value(self.data)?;
                Ok(OperationResult::MoreChoices(payload.choices))
            }
            OperationKind::GenerateRound => {
                let payload: RoundPayload = serde_json::from_value(self.data)?;
                Ok(OperationResult::NewRound {
                    number: payload.current_round_number,
                    majors: payload.current_round_majors,
                    pair: payload.choices,
                })
            }
            OperationKind::GenerateReport => {
                let report: FinalReport = serde_json::from_value(self.data)?;
                Ok(OperationResult::Report(report))
            }
        }
    }
}
