//! Application services: the tournament reducer, the round presentation
//! adapter and the controller that drives one session against the backend.

pub mod round_view;
pub mod session_controller;
pub mod tournament;

pub use round_view::{
    active_pair, advanced_names, eliminated_names, pending_names, render_report_markdown,
    MajorEntry, RoundSummary,
};
pub use session_controller::{SessionController, SessionView, SubmissionTicket};
pub use tournament::{recover_pending, NextStep, TournamentEvent, TournamentState};
