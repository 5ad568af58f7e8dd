/// Backend API port (trait) for dependency injection.
///
/// Defines the contract of the major-choice backend. Services depend on this
/// trait, not on the HTTP adapter, so the state machine and controller can be
/// exercised against an in-memory fake.
use async_trait::async_trait;

use crate::domain::errors::ClientResult;
use crate::domain::models::{
    BaseInformation, CandidatePair, OperationResult, SessionContent, TokenBundle, UserInfo,
};

/// A decided comparison: the shown pair plus the id the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecidedPair {
    pub pair: CandidatePair,
    pub winner_id: String,
}

/// Typed calls to the backend. Implementations perform no caching and no retries.
#[async_trait]
pub trait MajorApi: Send + Sync {
    /// Returns the URL the user must visit to log in.
    async fn request_login_url(&self) -> ClientResult<String>;

    /// Exchanges the authorization code from the redirect for tokens.
    ///
    /// # Errors
    /// `Auth` when the code is invalid or expired.
    async fn exchange_code(&self, code: &str, state: &str) -> ClientResult<TokenBundle>;

    /// # Errors
    /// `Auth` when the token is invalid; the caller must treat the user as logged out.
    async fn fetch_user_info(&self, access_token: &str) -> ClientResult<UserInfo>;

    /// Creates a session from questionnaire answers and returns its id.
    ///
    /// # Errors
    /// `Validation` listing every empty field, before any request is made.
    async fn submit_base_information(
        &self,
        info: &BaseInformation,
        access_token: &str,
    ) -> ClientResult<String>;

    async fn fetch_session_ids(&self, access_token: &str) -> ClientResult<Vec<String>>;

    async fn fetch_session_content(
        &self,
        session_id: &str,
        access_token: &str,
    ) -> ClientResult<SessionContent>;

    /// Saves a decision (or, with `None`, asks for the next step) and returns
    /// what the server generated next.
    ///
    /// # Errors
    /// `Conflict` when the session is finished or the pair is not the one the
    /// server has pending.
    async fn submit_choice_and_advance(
        &self,
        session_id: &str,
        decided: Option<&DecidedPair>,
        access_token: &str,
    ) -> ClientResult<OperationResult>;
}
