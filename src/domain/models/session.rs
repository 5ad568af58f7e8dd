/// Domain models for a questionnaire-plus-tournament session.
///
/// The client never owns a session; it holds a read-mostly projection of the
/// backend's copy and replaces it wholesale on every load.
use serde::{Deserialize, Serialize};

use super::report::FinalReport;
use super::round::Round;

/// Answers to the base-information questionnaire. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseInformation {
    #[serde(default)]
    pub max_living_expenses_from_parents: String,
    #[serde(default)]
    pub enough_savings_for_college: String,
    #[serde(default)]
    pub pocket_money_usage: String,
    #[serde(default)]
    pub willing_to_repeat_high_school_for_money: String,
    #[serde(default)]
    pub city_tier: String,
    #[serde(default)]
    pub parents_in_public_sector: String,
    #[serde(default)]
    pub has_stable_hobby: String,
    #[serde(default)]
    pub self_learning_after_gaokao: String,
    #[serde(default)]
    pub proactive_in_competitions: String,
    #[serde(default)]
    pub likes_reading_extracurricular_books: String,
}

impl BaseInformation {
    /// Field names paired with their answers, in questionnaire order.
    pub fn fields(&self) -> [(&'static str, &str); 10] {
        [
            (
                "max_living_expenses_from_parents",
                &self.max_living_expenses_from_parents,
            ),
            ("enough_savings_for_college", &self.enough_savings_for_college),
            ("pocket_money_usage", &self.pocket_money_usage),
            (
                "willing_to_repeat_high_school_for_money",
                &self.willing_to_repeat_high_school_for_money,
            ),
            ("city_tier", &self.city_tier),
            ("parents_in_public_sector", &self.parents_in_public_sector),
            ("has_stable_hobby", &self.has_stable_hobby),
            ("self_learning_after_gaokao", &self.self_learning_after_gaokao),
            ("proactive_in_competitions", &self.proactive_in_competitions),
            (
                "likes_reading_extracurricular_books",
                &self.likes_reading_extracurricular_books,
            ),
        ]
    }

    /// Names of unanswered fields; whitespace-only answers count as unanswered.
    pub fn missing_fields(&self) -> Vec<String> {
        self.fields()
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| (*name).to_string())
            .collect()
    }
}

/// Session lifecycle as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Finished,
    /// Any status string this client does not interpret
    Other(String),
}

impl From<String> for SessionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "IN_PROGRESS" => Self::InProgress,
            "FINISHED" => Self::Finished,
            _ => Self::Other(value),
        }
    }
}

impl From<SessionStatus> for String {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::InProgress => "IN_PROGRESS".to_string(),
            SessionStatus::Finished => "FINISHED".to_string(),
            SessionStatus::Other(value) => value,
        }
    }
}

/// Detail read of one session, as returned by `GET /sessions/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContent {
    #[serde(default)]
    pub base_information: BaseInformation,

    #[serde(default)]
    pub rounds: Vec<Round>,

    #[serde(default)]
    pub current_round_number: Option<u32>,

    #[serde(default)]
    pub status: Option<SessionStatus>,

    #[serde(default)]
    pub final_major_name: Option<String>,

    #[serde(default)]
    pub report: Option<FinalReport>,
}

impl SessionContent {
    /// A report or a `FINISHED` status both end the tournament.
    pub fn is_finished(&self) -> bool {
        self.report.is_some() || self.status == Some(SessionStatus::Finished)
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }
}
