//! Client errors for the majorbracket tournament client.

use thiserror::Error;

/// Every failure the client surfaces, grouped by how the caller must react.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport failure; the user may retry the same action.
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid or expired credentials; stored tokens must be cleared.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Required fields were empty; detected locally, never sent to the server.
    #[error("Missing required fields: {}", .missing_fields.join(", "))]
    Validation { missing_fields: Vec<String> },

    /// The server rejected the submitted pair as stale or the session as finished.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Local or received round data has an unexpected shape.
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    /// The caller used the state machine out of order, e.g. selecting with no pending pair.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Only transport failures are worth re-trying with the same input.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Auth failures force a logout; nothing else has a global effect.
    pub const fn requires_logout(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Short machine-readable kind, used by JSON output.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Validation { .. } => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::InconsistentState(_) => "inconsistent_state",
            Self::InvalidState(_) => "invalid_state",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InconsistentState(format!("undecodable response body: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::InconsistentState(format!("unexpected payload shape: {err}"))
    }
}
