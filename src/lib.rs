//! majorbracket - guided major-choice tournament client
//!
//! A user logs in, answers a short questionnaire that creates a session, then
//! decides a sequence of "major A vs. major B" comparisons. Each round
//! eliminates candidates until the backend generates a final report.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, the error taxonomy and port traits
//! - **Service Layer** (`services`): the tournament reducer, the round
//!   presentation adapter and the session controller
//! - **Infrastructure Layer** (`infrastructure`): HTTP client, configuration,
//!   logging and credential storage
//! - **CLI Layer** (`cli`): the terminal rendering layer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use majorbracket::{ApiConfig, HttpMajorApi, SessionController};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = Arc::new(HttpMajorApi::new(&ApiConfig::default())?);
//!     let controller = SessionController::open(api, "access-token", "session-id").await?;
//!     println!("{:?}", controller.view().pending);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    ApiConfig, BaseInformation, Candidate, CandidatePair, Config, FinalReport, OperationResult,
    Outcome, Round, RoundStatus, SessionContent,
};
pub use domain::ports::{CredentialStore, DecidedPair, MajorApi};
pub use domain::{ClientError, ClientResult};
pub use infrastructure::api::HttpMajorApi;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{RoundSummary, SessionController, SessionView, TournamentEvent, TournamentState};
