//! Round/choice state machine.
//!
//! A pure reducer over the round history of one session. Every change is an
//! explicit [`TournamentEvent`]; the optimistic update around a submission is
//! expressed as `SelectionApplied` followed by either `OperationResolved` or
//! `SelectionRolledBack`, so the whole flow can be tested without a network.

use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::models::{
    Candidate, CandidatePair, FinalReport, OperationResult, Outcome, Round,
};

/// Everything that can happen to a session's round history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentEvent {
    /// Full replace with data loaded from the server
    Loaded {
        rounds: Vec<Round>,
        report: Option<FinalReport>,
    },
    /// Pending pair found by scanning the last round after a reload
    PendingRecovered(CandidatePair),
    /// Optimistic marks for a submission that has not been confirmed yet
    SelectionApplied {
        pair: CandidatePair,
        winner_id: String,
    },
    /// The submission failed; undo its marks and offer the pair again
    SelectionRolledBack { pair: CandidatePair },
    /// The server answered a submission or a next-step request
    OperationResolved(OperationResult),
}

impl TournamentEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loaded { .. } => "loaded",
            Self::PendingRecovered(_) => "pending_recovered",
            Self::SelectionApplied { .. } => "selection_applied",
            Self::SelectionRolledBack { .. } => "selection_rolled_back",
            Self::OperationResolved(_) => "operation_resolved",
        }
    }
}

/// What the owner of the state should do next to keep the session moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// No rounds yet: ask the server to generate the first one
    Bootstrap,
    /// Last round is active but nothing is pending: scan it for a pair
    Recover,
    /// A pair is waiting for the user
    AwaitSelection,
    /// Last round is completed and no report exists; wait for the user
    AwaitUser,
    /// Report present; nothing more can happen
    Finished,
}

/// An outcome set by a selection the server has not confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UnconfirmedMark {
    id: String,
    appended: bool,
}

/// Round history, pending pair and report of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentState {
    rounds: Vec<Round>,
    pending: Option<CandidatePair>,
    active_round_index: Option<usize>,
    report: Option<FinalReport>,
    unconfirmed: Vec<UnconfirmedMark>,
}

impl TournamentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub const fn pending(&self) -> Option<&CandidatePair> {
        self.pending.as_ref()
    }

    pub const fn active_round_index(&self) -> Option<usize> {
        self.active_round_index
    }

    pub const fn report(&self) -> Option<&FinalReport> {
        self.report.as_ref()
    }

    pub const fn is_finished(&self) -> bool {
        self.report.is_some()
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn is_active_round(&self, index: usize) -> bool {
        !self.is_finished() && self.active_round_index == Some(index)
    }

    pub fn next_step(&self) -> NextStep {
        if self.is_finished() {
            return NextStep::Finished;
        }
        if self.pending.is_some() {
            return NextStep::AwaitSelection;
        }
        match self.rounds.last() {
            None => NextStep::Bootstrap,
            Some(round) if round.is_active() => NextStep::Recover,
            Some(_) => NextStep::AwaitUser,
        }
    }

    /// Validates a user decision and returns the event that records it.
    ///
    /// # Errors
    /// `InvalidState` when the session is finished, nothing is pending, or
    /// `winner_id` is not part of the pending pair.
    pub fn begin_selection(&self, winner_id: &str) -> ClientResult<TournamentEvent> {
        if self.is_finished() {
            return Err(ClientError::InvalidState(
                "session is finished; no further selections".to_string(),
            ));
        }
        let pair = self
            .pending
            .as_ref()
            .ok_or_else(|| ClientError::InvalidState("no pending pair".to_string()))?;
        if !pair.contains(winner_id) {
            return Err(ClientError::InvalidState(format!(
                "{winner_id} is not part of the pending pair"
            )));
        }
        Ok(TournamentEvent::SelectionApplied {
            pair: pair.clone(),
            winner_id: winner_id.to_string(),
        })
    }

    /// Applies one event, returning the next state.
    ///
    /// # Errors
    /// `InconsistentState` when a server result does not fit the history,
    /// `InvalidState` when the event is out of order. The input state is
    /// consumed either way; callers that need it afterwards keep a clone.
    pub fn apply(mut self, event: TournamentEvent) -> ClientResult<Self> {
        tracing::debug!(event = event.name(), rounds = self.rounds.len(), "applying event");

        match event {
            TournamentEvent::Loaded { rounds, report } => {
                self.rounds = rounds.into_iter().map(Round::normalized).collect();
                self.active_round_index = self.rounds.len().checked_sub(1);
                self.pending = None;
                self.report = report;
                self.unconfirmed.clear();
            }
            TournamentEvent::PendingRecovered(pair) => {
                self.ensure_open()?;
                self.pending = Some(pair);
            }
            TournamentEvent::SelectionApplied { pair, winner_id } => {
                self.ensure_open()?;
                if self.pending.as_ref() != Some(&pair) {
                    return Err(ClientError::InvalidState(
                        "selection does not match the pending pair".to_string(),
                    ));
                }
                let (winner, loser) = pair.split(&winner_id).ok_or_else(|| {
                    ClientError::InvalidState(format!("{winner_id} is not part of the pair"))
                })?;
                let round = self.last_round_mut()?;
                let marks = [
                    mark(round, winner, Outcome::Advanced),
                    mark(round, loser, Outcome::Eliminated),
                ];
                self.unconfirmed = marks.into_iter().flatten().collect();
                self.pending = None;
            }
            TournamentEvent::SelectionRolledBack { pair } => {
                self.ensure_open()?;
                let marks = std::mem::take(&mut self.unconfirmed);
                let round = self.last_round_mut()?;
                for mark in marks {
                    if mark.appended {
                        round.appearances.retain(|c| c.id != mark.id);
                    } else {
                        round.set_outcome(&mark.id, Outcome::Undecided);
                    }
                }
                tracing::warn!(pair = ?pair.ids(), "selection rolled back");
                self.pending = Some(pair);
            }
            TournamentEvent::OperationResolved(result) => {
                self.ensure_open()?;
                self = self.resolve(result)?;
                self.unconfirmed.clear();
            }
        }

        Ok(self)
    }

    fn resolve(mut self, result: OperationResult) -> ClientResult<Self> {
        match result {
            OperationResult::MoreChoices(pair) => {
                let round = self.rounds.last_mut().ok_or_else(|| {
                    ClientError::InconsistentState(
                        "received choices before any round exists".to_string(),
                    )
                })?;
                // Outcomes never revert: a re-offered candidate leaves the round untouched.
                if pair.iter().any(|c| round.appearance(&c.id).is_some()) {
                    tracing::debug!(pair = ?pair.ids(), "pair already appears in round, not appending");
                } else {
                    for candidate in pair.iter() {
                        round.upsert_appearance(candidate.clone());
                    }
                }
                tracing::debug!(round = round.round_number, pair = ?pair.ids(), "more choices");
                self.pending = Some(pair);
            }
            OperationResult::NewRound {
                number,
                majors,
                pair,
            } => {
                let expected = self.rounds.last().map_or(1, |r| r.round_number + 1);
                if number != expected {
                    return Err(ClientError::InconsistentState(format!(
                        "server started round {number}, expected round {expected}"
                    )));
                }
                let mut round = Round::new(number, majors);
                for candidate in pair.iter() {
                    round.upsert_appearance(candidate.clone());
                }
                self.rounds.push(round);
                self.active_round_index = Some(self.rounds.len() - 1);
                self.pending = Some(pair);
                tracing::info!(round = number, "new round started");
            }
            OperationResult::Report(report) => {
                tracing::info!(finalists = ?report.final_three_majors, "report generated");
                self.report = Some(report);
                self.pending = None;
            }
        }
        Ok(self)
    }

    fn ensure_open(&self) -> ClientResult<()> {
        if self.is_finished() {
            Err(ClientError::InvalidState(
                "session already has a report".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn last_round_mut(&mut self) -> ClientResult<&mut Round> {
        self.rounds
            .last_mut()
            .ok_or_else(|| ClientError::InconsistentState("no rounds loaded".to_string()))
    }
}

/// Sets an undecided outcome. Appearances that are already decided keep theirs.
fn mark(round: &mut Round, candidate: &Candidate, outcome: Outcome) -> Option<UnconfirmedMark> {
    match round.appearance(&candidate.id).map(|c| c.outcome) {
        Some(Outcome::Undecided) => {
            round.set_outcome(&candidate.id, outcome);
            Some(UnconfirmedMark {
                id: candidate.id.clone(),
                appended: false,
            })
        }
        Some(decided) => {
            tracing::debug!(id = %candidate.id, outcome = ?decided, "keeping decided outcome");
            None
        }
        None => {
            round.upsert_appearance(candidate.clone().with_outcome(outcome));
            Some(UnconfirmedMark {
                id: candidate.id.clone(),
                appended: true,
            })
        }
    }
}

/// Finds the pair still waiting for a decision in a reloaded round.
///
/// # Errors
/// `InconsistentState` unless exactly two appearances are undecided; the
/// caller should then ask the server for fresh choices.
pub fn recover_pending(round: &Round) -> ClientResult<CandidatePair> {
    let undecided: Vec<&Candidate> = round.undecided().collect();
    match undecided.as_slice() {
        [first, second] => Ok(CandidatePair::new((*first).clone(), (*second).clone())),
        other => Err(ClientError::InconsistentState(format!(
            "round {} has {} undecided appearances, expected 2",
            round.round_number,
            other.len()
        ))),
    }
}
