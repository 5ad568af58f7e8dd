//! Common test utilities for integration tests
//!
//! Provides shared fixtures, a scripted in-memory backend and logging setup
//! used across multiple integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use majorbracket::domain::models::{
    BaseInformation, Candidate, CandidatePair, FinalReport, OperationResult, Round,
    SessionContent, TokenBundle, UserInfo,
};
use majorbracket::domain::ports::{DecidedPair, MajorApi};
use majorbracket::{ClientError, ClientResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn candidate(id: &str, name: &str, index: u32) -> Candidate {
    Candidate::new(id, name, index).with_description(format!("About {name}"))
}

pub fn cs_bio_pair() -> CandidatePair {
    CandidatePair::new(candidate("m-cs", "CS", 0), candidate("m-bio", "Bio", 1))
}

pub fn final_report() -> FinalReport {
    FinalReport {
        final_three_majors: vec!["CS".into(), "EE".into(), "Math".into()],
        final_three_majors_report: vec![
            "Strong analytical fit.".into(),
            "Hands-on engineering.".into(),
            "Abstract reasoning.".into(),
        ],
        final_recommendation: "Computer Science".into(),
    }
}

pub fn complete_base_information() -> BaseInformation {
    BaseInformation {
        max_living_expenses_from_parents: "1500".into(),
        enough_savings_for_college: "yes".into(),
        pocket_money_usage: "books".into(),
        willing_to_repeat_high_school_for_money: "no".into(),
        city_tier: "tier-1".into(),
        parents_in_public_sector: "no".into(),
        has_stable_hobby: "music".into(),
        self_learning_after_gaokao: "programming".into(),
        proactive_in_competitions: "yes".into(),
        likes_reading_extracurricular_books: "yes".into(),
    }
}

pub fn content_with(rounds: Vec<Round>) -> SessionContent {
    SessionContent {
        base_information: complete_base_information(),
        rounds,
        ..SessionContent::default()
    }
}

/// One recorded `submit_choice_and_advance` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub session_id: String,
    pub decided: Option<DecidedPair>,
}

/// In-memory backend: serves scripted session content and replays scripted
/// operation results in order, recording every call.
#[derive(Default)]
pub struct ScriptedApi {
    contents: Mutex<VecDeque<SessionContent>>,
    last_content: Mutex<SessionContent>,
    results: Mutex<VecDeque<ClientResult<OperationResult>>>,
    submissions: Mutex<Vec<RecordedSubmission>>,
    content_loads: Mutex<usize>,
}

impl ScriptedApi {
    pub fn new(content: SessionContent) -> Self {
        let api = Self::default();
        *api.last_content.lock().unwrap() = content;
        api
    }

    /// Queue a result for the next submission.
    pub fn then(self, result: ClientResult<OperationResult>) -> Self {
        self.results.lock().unwrap().push_back(result);
        self
    }

    /// Queue session content for the next load; later loads repeat the last one.
    pub fn then_content(self, content: SessionContent) -> Self {
        self.contents.lock().unwrap().push_back(content);
        self
    }

    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn content_loads(&self) -> usize {
        *self.content_loads.lock().unwrap()
    }
}

#[async_trait]
impl MajorApi for ScriptedApi {
    async fn request_login_url(&self) -> ClientResult<String> {
        Ok("http://auth.test/login".into())
    }

    async fn exchange_code(&self, _code: &str, _state: &str) -> ClientResult<TokenBundle> {
        Err(ClientError::Auth("not scripted".into()))
    }

    async fn fetch_user_info(&self, _access_token: &str) -> ClientResult<UserInfo> {
        Err(ClientError::Auth("not scripted".into()))
    }

    async fn submit_base_information(
        &self,
        info: &BaseInformation,
        _access_token: &str,
    ) -> ClientResult<String> {
        let missing_fields = info.missing_fields();
        if missing_fields.is_empty() {
            Ok("s-1".into())
        } else {
            Err(ClientError::Validation { missing_fields })
        }
    }

    async fn fetch_session_ids(&self, _access_token: &str) -> ClientResult<Vec<String>> {
        Ok(vec!["s-1".into()])
    }

    async fn fetch_session_content(
        &self,
        _session_id: &str,
        _access_token: &str,
    ) -> ClientResult<SessionContent> {
        *self.content_loads.lock().unwrap() += 1;
        let mut last = self.last_content.lock().unwrap();
        if let Some(next) = self.contents.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }

    async fn submit_choice_and_advance(
        &self,
        session_id: &str,
        decided: Option<&DecidedPair>,
        _access_token: &str,
    ) -> ClientResult<OperationResult> {
        self.submissions.lock().unwrap().push(RecordedSubmission {
            session_id: session_id.to_string(),
            decided: decided.cloned(),
        });
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted result left".into())))
    }
}
