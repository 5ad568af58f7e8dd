//! Session content controller.
//!
//! Owns the round history of exactly one open session. Loads it from the
//! backend, keeps it moving (bootstrap, mid-session recovery), wires user
//! decisions through the tournament reducer and exposes a render-ready view.
//!
//! Every mutating method takes `&mut self`, so a refresh can only start after
//! a submission's result has been applied.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use majorbracket::domain::ports::MajorApi;
//! use majorbracket::services::SessionController;
//!
//! async fn example(api: Arc<dyn MajorApi>) -> majorbracket::ClientResult<()> {
//!     let mut controller = SessionController::open(api, "token", "session-1").await?;
//!     if let Some(pair) = controller.view().pending {
//!         let winner = pair.first().id.clone();
//!         controller.select_candidate(&winner).await?;
//!     }
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::round_view::RoundSummary;
use super::tournament::{recover_pending, NextStep, TournamentEvent, TournamentState};
use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::models::{
    BaseInformation, CandidatePair, FinalReport, OperationResult, SessionContent, SessionStatus,
};
use crate::domain::ports::{DecidedPair, MajorApi};

/// A submission in flight. Captures the session it was issued for and the
/// load generation it was built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    session_id: String,
    generation: u64,
    decided: DecidedPair,
}

impl SubmissionTicket {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub const fn decided(&self) -> &DecidedPair {
        &self.decided
    }
}

/// Render-ready snapshot of the open session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub rounds: Vec<RoundSummary>,
    /// Never set for a finished session
    pub pending: Option<CandidatePair>,
    pub report: Option<FinalReport>,
    pub final_major_name: Option<String>,
    pub finished: bool,
}

pub struct SessionController<A: MajorApi + ?Sized> {
    api: Arc<A>,
    access_token: String,
    session_id: String,
    base_information: BaseInformation,
    status: Option<SessionStatus>,
    final_major_name: Option<String>,
    state: TournamentState,
    /// Bumped on every reload; tickets from an earlier generation are stale.
    generation: u64,
}

impl<A: MajorApi + ?Sized> SessionController<A> {
    /// Loads a session and brings it to a state where the user can act.
    ///
    /// With no rounds yet, issues exactly one bootstrap request. With an
    /// active last round, recovers the pending pair or, when that fails,
    /// asks the server for fresh choices.
    ///
    /// # Errors
    /// Any `ClientError` from loading or from the bootstrap request.
    #[instrument(skip(api, access_token, session_id))]
    pub async fn open(
        api: Arc<A>,
        access_token: impl Into<String>,
        session_id: impl Into<String>,
    ) -> ClientResult<Self> {
        let mut controller = Self {
            api,
            access_token: access_token.into(),
            session_id: session_id.into(),
            base_information: BaseInformation::default(),
            status: None,
            final_major_name: None,
            state: TournamentState::new(),
            generation: 0,
        };
        controller.reload(true).await?;
        Ok(controller)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub const fn state(&self) -> &TournamentState {
        &self.state
    }

    pub const fn base_information(&self) -> &BaseInformation {
        &self.base_information
    }

    /// True once a report exists or the server marked the session finished.
    pub fn is_finished(&self) -> bool {
        self.state.is_finished() || self.status == Some(SessionStatus::Finished)
    }

    pub fn pending(&self) -> Option<&CandidatePair> {
        if self.is_finished() {
            None
        } else {
            self.state.pending()
        }
    }

    /// Records the user's decision and submits it.
    ///
    /// On failure the pair is offered again with its outcomes undone. A
    /// `Conflict` additionally triggers a full refresh, since the server no
    /// longer agrees with the local pair.
    ///
    /// # Errors
    /// `InvalidState` when no matching pair is pending, otherwise the
    /// submission's error.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn select_candidate(&mut self, winner_id: &str) -> ClientResult<()> {
        let ticket = self.begin_submission(winner_id)?;
        let result = self
            .api
            .submit_choice_and_advance(&ticket.session_id, Some(&ticket.decided), &self.access_token)
            .await;
        self.finish_submission(ticket, result).await
    }

    /// First half of a submission: validates, marks optimistically and
    /// clears the pending pair before any network call.
    ///
    /// # Errors
    /// `InvalidState` when the session is finished or `winner_id` is not pending.
    pub fn begin_submission(&mut self, winner_id: &str) -> ClientResult<SubmissionTicket> {
        if self.is_finished() {
            return Err(ClientError::InvalidState(
                "session is finished; no further selections".to_string(),
            ));
        }
        let event = self.state.begin_selection(winner_id)?;
        let TournamentEvent::SelectionApplied { pair, .. } = &event else {
            return Err(ClientError::InvalidState(
                "selection produced an unexpected event".to_string(),
            ));
        };
        let decided = DecidedPair {
            pair: pair.clone(),
            winner_id: winner_id.to_string(),
        };
        self.dispatch(event)?;
        debug!(winner = winner_id, "selection applied optimistically");

        Ok(SubmissionTicket {
            session_id: self.session_id.clone(),
            generation: self.generation,
            decided,
        })
    }

    /// Second half of a submission: applies the server's answer or rolls back.
    ///
    /// Results are dropped when the session was switched or reloaded since
    /// the ticket was issued, including a switch away and back again.
    ///
    /// # Errors
    /// The submission's error after rollback, or `InconsistentState` when the
    /// answer does not fit the local history (the session is then reloaded).
    pub async fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        result: ClientResult<OperationResult>,
    ) -> ClientResult<()> {
        if ticket.session_id != self.session_id || ticket.generation != self.generation {
            debug!(
                stale_session = %ticket.session_id,
                stale_generation = ticket.generation,
                open_session = %self.session_id,
                generation = self.generation,
                "discarding result issued against state that has since been replaced"
            );
            return Ok(());
        }

        match result {
            Ok(operation) => {
                let kind = operation.kind();
                if let Err(err) = self.dispatch(TournamentEvent::OperationResolved(operation)) {
                    warn!(error = %err, operation = kind.as_str(), "result did not fit local rounds, reloading");
                    self.refresh_quietly().await;
                    return Err(err);
                }
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "submission failed, restoring pair");
                self.dispatch(TournamentEvent::SelectionRolledBack {
                    pair: ticket.decided.pair,
                })?;
                if matches!(err, ClientError::Conflict(_)) {
                    self.refresh_quietly().await;
                }
                Err(err)
            }
        }
    }

    /// Asks the server for the next comparison when nothing is pending, e.g.
    /// after reopening a session whose last round is completed.
    ///
    /// # Errors
    /// `InvalidState` when the session is finished or a pair is already
    /// pending, otherwise the request's error.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn request_next(&mut self) -> ClientResult<()> {
        if self.is_finished() {
            return Err(ClientError::InvalidState("session is finished".to_string()));
        }
        if self.state.pending().is_some() {
            return Err(ClientError::InvalidState(
                "a comparison is already pending".to_string(),
            ));
        }
        self.advance().await
    }

    /// Replaces all local state with the server's view of the open session.
    ///
    /// # Errors
    /// Any `ClientError` from loading or from the follow-up choices request.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.reload(false).await
    }

    /// Opens another session in place. Old state is discarded entirely and
    /// in-flight tickets for the old session become stale.
    ///
    /// # Errors
    /// Same as [`SessionController::open`].
    #[instrument(skip(self))]
    pub async fn switch_session(&mut self, session_id: &str) -> ClientResult<()> {
        self.session_id = session_id.to_string();
        self.base_information = BaseInformation::default();
        self.status = None;
        self.final_major_name = None;
        self.state = TournamentState::new();
        self.reload(true).await
    }

    pub fn view(&self) -> SessionView {
        let finished = self.is_finished();
        let latest = self.pending();
        let rounds = self
            .state
            .rounds()
            .iter()
            .enumerate()
            .map(|(index, round)| {
                let is_active = !finished && self.state.is_active_round(index);
                RoundSummary::from_round(round, is_active, latest)
            })
            .collect();

        SessionView {
            session_id: self.session_id.clone(),
            rounds,
            pending: latest.cloned(),
            report: self.state.report().cloned(),
            final_major_name: self.final_major_name.clone(),
            finished,
        }
    }

    async fn reload(&mut self, allow_bootstrap: bool) -> ClientResult<()> {
        self.generation += 1;
        let content = self
            .api
            .fetch_session_content(&self.session_id, &self.access_token)
            .await?;
        self.load(content)?;
        self.resume(allow_bootstrap).await
    }

    async fn refresh_quietly(&mut self) {
        if let Err(err) = self.reload(false).await {
            warn!(error = %err, "refresh after failed submission also failed");
        }
    }

    fn load(&mut self, content: SessionContent) -> ClientResult<()> {
        let SessionContent {
            base_information,
            rounds,
            status,
            final_major_name,
            report,
            ..
        } = content;

        debug!(rounds = rounds.len(), has_report = report.is_some(), "session content loaded");
        self.base_information = base_information;
        self.status = status;
        self.final_major_name = final_major_name;
        self.dispatch(TournamentEvent::Loaded { rounds, report })
    }

    async fn resume(&mut self, allow_bootstrap: bool) -> ClientResult<()> {
        if self.is_finished() {
            return Ok(());
        }

        match self.state.next_step() {
            NextStep::Bootstrap if allow_bootstrap => {
                debug!("no rounds yet, bootstrapping");
                self.advance().await
            }
            NextStep::Recover => {
                let recovered = self
                    .state
                    .last_round()
                    .map(recover_pending)
                    .unwrap_or_else(|| {
                        Err(ClientError::InconsistentState("no rounds loaded".to_string()))
                    });
                match recovered {
                    Ok(pair) => {
                        debug!(pair = ?pair.ids(), "pending pair recovered");
                        self.dispatch(TournamentEvent::PendingRecovered(pair))
                    }
                    Err(err) => {
                        warn!(error = %err, "no recoverable pair, requesting fresh choices");
                        self.advance().await
                    }
                }
            }
            NextStep::Bootstrap
            | NextStep::AwaitSelection
            | NextStep::AwaitUser
            | NextStep::Finished => Ok(()),
        }
    }

    /// Asks the server for the next step without submitting a decision.
    async fn advance(&mut self) -> ClientResult<()> {
        let operation = self
            .api
            .submit_choice_and_advance(&self.session_id, None, &self.access_token)
            .await?;
        self.dispatch(TournamentEvent::OperationResolved(operation))
    }

    fn dispatch(&mut self, event: TournamentEvent) -> ClientResult<()> {
        self.state = self.state.clone().apply(event)?;
        Ok(())
    }
}
