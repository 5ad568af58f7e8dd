//! Session controller tests against a scripted in-memory backend.
//!
//! Test coverage:
//! - Bootstrap of a session with no rounds
//! - Mid-session recovery and the fallback choices request
//! - Optimistic selection, rollback on failure and refresh on conflict
//! - Report handling and the terminal state
//! - Session-switch guard for late results

mod common;

use common::{
    candidate, content_with, cs_bio_pair, final_report, setup_test_logging, ScriptedApi,
};
use majorbracket::domain::models::{
    CandidatePair, OperationResult, Outcome, Round, RoundStatus, SessionStatus,
};
use majorbracket::services::{advanced_names, eliminated_names, SessionController};
use majorbracket::ClientError;
use std::sync::Arc;

fn first_round(majors: &[&str]) -> OperationResult {
    OperationResult::NewRound {
        number: 1,
        majors: majors.iter().map(ToString::to_string).collect(),
        pair: cs_bio_pair(),
    }
}

fn active_round_with_pair() -> Round {
    let mut round = Round::new(1, vec!["CS".into(), "Bio".into(), "EE".into()]);
    round.appearances = vec![
        candidate("m-cs", "CS", 0),
        candidate("m-bio", "Bio", 1),
    ];
    round
}

#[tokio::test]
async fn test_bootstrap_issues_exactly_one_request() {
    setup_test_logging();
    let api = Arc::new(ScriptedApi::new(content_with(vec![])).then(Ok(first_round(&["CS", "Bio"]))));

    let controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    let submissions = api.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].decided, None);

    let view = controller.view();
    assert_eq!(view.rounds.len(), 1);
    assert_eq!(view.rounds.iter().filter(|r| r.is_active).count(), 1);
    assert_eq!(view.pending, Some(cs_bio_pair()));
    assert_eq!(view.rounds[0].active_pair, Some(cs_bio_pair()));
}

#[tokio::test]
async fn test_empty_active_round_requests_choices() {
    let round = Round::new(1, vec!["CS".into(), "Bio".into()]);
    let api = Arc::new(
        ScriptedApi::new(content_with(vec![round]))
            .then(Ok(OperationResult::MoreChoices(cs_bio_pair()))),
    );

    let controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    assert_eq!(api.submissions().len(), 1);
    assert_eq!(api.submissions()[0].decided, None);
    assert_eq!(controller.pending(), Some(&cs_bio_pair()));
    assert_eq!(controller.view().rounds[0].pending, vec!["CS", "Bio"]);
}

#[tokio::test]
async fn test_reopen_recovers_pending_pair_without_request() {
    let api = Arc::new(ScriptedApi::new(content_with(vec![active_round_with_pair()])));

    let controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    assert!(api.submissions().is_empty());
    assert_eq!(controller.pending(), Some(&cs_bio_pair()));
}

#[tokio::test]
async fn test_selection_submits_winner_and_applies_more_choices() {
    let next = CandidatePair::new(candidate("m-ee", "EE", 2), candidate("m-cs", "CS", 0));
    let api = Arc::new(
        ScriptedApi::new(content_with(vec![active_round_with_pair()]))
            .then(Ok(OperationResult::MoreChoices(next.clone()))),
    );
    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    controller.select_candidate("m-cs").await.unwrap();

    let submission = &api.submissions()[0];
    let decided = submission.decided.as_ref().unwrap();
    assert_eq!(decided.winner_id, "m-cs");
    assert_eq!(decided.pair, cs_bio_pair());

    let round = &controller.state().rounds()[0];
    assert_eq!(advanced_names(round), vec!["CS"]);
    assert_eq!(eliminated_names(round), vec!["Bio"]);
    assert_eq!(round.appearances.len(), 2);
    assert_eq!(round.appearance("m-cs").unwrap().outcome, Outcome::Advanced);
    assert_eq!(controller.pending(), Some(&next));
}

#[tokio::test]
async fn test_report_after_selection_is_terminal() {
    let api = Arc::new(
        ScriptedApi::new(content_with(vec![active_round_with_pair()]))
            .then(Ok(OperationResult::Report(final_report()))),
    );
    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    controller.select_candidate("m-cs").await.unwrap();

    let view = controller.view();
    assert!(view.finished);
    assert_eq!(view.report, Some(final_report()));
    assert!(view.pending.is_none());
    assert!(view.rounds.iter().all(|r| !r.is_active && r.active_pair.is_none()));

    let round = &controller.state().rounds()[0];
    assert_eq!(round.appearances.len(), 2);
    assert_eq!(round.appearance("m-cs").unwrap().outcome, Outcome::Advanced);
    assert_eq!(round.appearance("m-bio").unwrap().outcome, Outcome::Eliminated);

    let before = controller.state().clone();
    let err = controller.select_candidate("m-bio").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidState(_)));
    assert_eq!(controller.state(), &before);
    assert_eq!(api.submissions().len(), 1);
}

#[tokio::test]
async fn test_network_failure_restores_pending_pair() {
    let api = Arc::new(
        ScriptedApi::new(content_with(vec![active_round_with_pair()]))
            .then(Err(ClientError::Network("connection reset".into()))),
    );
    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();
    let before = controller.state().clone();

    let err = controller.select_candidate("m-cs").await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(controller.pending(), Some(&cs_bio_pair()));
    assert_eq!(controller.state(), &before);
    let round = &controller.state().rounds()[0];
    assert!(round.appearances.iter().all(|c| c.outcome == Outcome::Undecided));
}

#[tokio::test]
async fn test_double_selection_is_invalid_state() {
    let api = Arc::new(
        ScriptedApi::new(content_with(vec![active_round_with_pair()]))
            .then(Ok(OperationResult::Report(final_report()))),
    );
    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    let ticket = controller.begin_submission("m-cs").unwrap();
    assert!(controller.pending().is_none());

    let err = controller.begin_submission("m-cs").unwrap_err();
    assert!(matches!(err, ClientError::InvalidState(_)));
    assert_eq!(controller.state().rounds()[0].appearances.len(), 2);

    controller
        .finish_submission(ticket, Ok(OperationResult::Report(final_report())))
        .await
        .unwrap();
    assert!(controller.is_finished());
}

#[tokio::test]
async fn test_conflict_triggers_full_refresh() {
    let mut server_round = active_round_with_pair();
    server_round.appearances[0].outcome = Outcome::Advanced;
    server_round.appearances[1].outcome = Outcome::Eliminated;
    server_round.appearances.push(candidate("m-ee", "EE", 2));
    server_round.appearances.push(candidate("m-math", "Math", 3));

    let api = Arc::new(
        ScriptedApi::new(content_with(vec![active_round_with_pair()]))
            .then_content(content_with(vec![active_round_with_pair()]))
            .then_content(content_with(vec![server_round]))
            .then(Err(ClientError::Conflict("pair is stale".into()))),
    );
    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    let err = controller.select_candidate("m-bio").await.unwrap_err();

    assert!(matches!(err, ClientError::Conflict(_)));
    assert_eq!(api.content_loads(), 2);
    let expected = CandidatePair::new(candidate("m-ee", "EE", 2), candidate("m-math", "Math", 3));
    assert_eq!(controller.pending(), Some(&expected));
    assert_eq!(advanced_names(&controller.state().rounds()[0]), vec!["CS"]);
}

#[tokio::test]
async fn test_finished_session_offers_nothing() {
    let mut content = content_with(vec![active_round_with_pair()]);
    content.status = Some(SessionStatus::Finished);
    content.final_major_name = Some("CS".into());
    let api = Arc::new(ScriptedApi::new(content));

    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    assert!(api.submissions().is_empty());
    let view = controller.view();
    assert!(view.finished);
    assert!(view.pending.is_none());
    assert_eq!(view.final_major_name.as_deref(), Some("CS"));
    assert!(matches!(
        controller.select_candidate("m-cs").await,
        Err(ClientError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_completed_round_waits_then_request_next() {
    let mut round = Round::new(1, vec!["CS".into(), "Bio".into()]);
    round.status = RoundStatus::Completed;
    let next_round = OperationResult::NewRound {
        number: 2,
        majors: vec!["CS".into(), "EE".into()],
        pair: CandidatePair::new(candidate("m-cs", "CS", 0), candidate("m-ee", "EE", 1)),
    };
    let api = Arc::new(ScriptedApi::new(content_with(vec![round])).then(Ok(next_round)));

    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();
    assert!(api.submissions().is_empty());
    assert!(controller.pending().is_none());

    controller.request_next().await.unwrap();

    let view = controller.view();
    assert_eq!(view.rounds.len(), 2);
    assert!(!view.rounds[0].is_active);
    assert!(view.rounds[1].is_active);
    assert_eq!(view.rounds[1].round_number, 2);
    assert!(matches!(
        controller.request_next().await,
        Err(ClientError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_out_of_sequence_round_reloads_session() {
    let api = Arc::new(
        ScriptedApi::new(content_with(vec![active_round_with_pair()])).then(Ok(
            OperationResult::NewRound {
                number: 5,
                majors: vec![],
                pair: cs_bio_pair(),
            },
        )),
    );
    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    let err = controller.select_candidate("m-cs").await.unwrap_err();

    assert!(matches!(err, ClientError::InconsistentState(_)));
    assert_eq!(api.content_loads(), 2);
    assert_eq!(controller.state().rounds().len(), 1);
    assert_eq!(controller.pending(), Some(&cs_bio_pair()));
}

#[tokio::test]
async fn test_late_result_for_previous_session_is_ignored() {
    let api = Arc::new(ScriptedApi::new(content_with(vec![active_round_with_pair()])));
    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    let ticket = controller.begin_submission("m-cs").unwrap();
    controller.switch_session("s-2").await.unwrap();
    assert_eq!(controller.session_id(), "s-2");
    let before = controller.view();

    controller
        .finish_submission(ticket, Ok(OperationResult::Report(final_report())))
        .await
        .unwrap();

    assert_eq!(controller.view(), before);
    assert!(!controller.is_finished());
    assert_eq!(controller.pending(), Some(&cs_bio_pair()));
}

fn round_moved_on() -> Round {
    let mut round = active_round_with_pair();
    round.appearances[0].outcome = Outcome::Advanced;
    round.appearances[1].outcome = Outcome::Eliminated;
    round.appearances.push(candidate("m-ee", "EE", 2));
    round.appearances.push(candidate("m-math", "Math", 3));
    round
}

fn ee_math_pair() -> CandidatePair {
    CandidatePair::new(candidate("m-ee", "EE", 2), candidate("m-math", "Math", 3))
}

#[tokio::test]
async fn test_late_result_after_switching_back_is_ignored() {
    let api = Arc::new(
        ScriptedApi::new(content_with(vec![]))
            .then_content(content_with(vec![active_round_with_pair()]))
            .then_content(content_with(vec![active_round_with_pair()]))
            .then_content(content_with(vec![round_moved_on()])),
    );
    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    let ticket = controller.begin_submission("m-cs").unwrap();
    controller.switch_session("s-2").await.unwrap();
    controller.switch_session("s-1").await.unwrap();
    assert_eq!(controller.pending(), Some(&ee_math_pair()));
    let before = controller.view();

    controller
        .finish_submission(ticket, Err(ClientError::Network("late".into())))
        .await
        .unwrap();

    assert_eq!(controller.view(), before);
    assert_eq!(controller.pending(), Some(&ee_math_pair()));
    assert_eq!(advanced_names(&controller.state().rounds()[0]), vec!["CS"]);
    assert!(api.submissions().is_empty());
}

#[tokio::test]
async fn test_result_issued_before_refresh_is_ignored() {
    let api = Arc::new(
        ScriptedApi::new(content_with(vec![]))
            .then_content(content_with(vec![active_round_with_pair()]))
            .then_content(content_with(vec![round_moved_on()])),
    );
    let mut controller = SessionController::open(Arc::clone(&api), "token", "s-1")
        .await
        .unwrap();

    let ticket = controller.begin_submission("m-bio").unwrap();
    controller.refresh().await.unwrap();
    let before = controller.view();

    controller
        .finish_submission(ticket, Err(ClientError::Network("late".into())))
        .await
        .unwrap();

    assert_eq!(controller.view(), before);
    assert_eq!(controller.pending(), Some(&ee_math_pair()));
    assert_eq!(eliminated_names(&controller.state().rounds()[0]), vec!["Bio"]);
}
