pub mod auth;
pub mod candidate;
pub mod config;
pub mod operation;
pub mod report;
pub mod round;
pub mod session;

pub use auth::{TokenBundle, UserInfo};
pub use candidate::{Candidate, CandidatePair, MajorChoice, MajorChoiceRequest, Outcome};
pub use config::{ApiConfig, Config, CredentialsConfig, LoggingConfig};
pub use operation::{OperationEnvelope, OperationKind, OperationResult};
pub use report::FinalReport;
pub use round::{Round, RoundStatus};
pub use session::{BaseInformation, SessionContent, SessionStatus};
