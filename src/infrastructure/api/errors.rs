use reqwest::StatusCode;

use crate::domain::errors::ClientError;

/// Which endpoint produced a response; only affects how 400 is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Callback,
    UserInfo,
    Sessions,
    SessionContent,
    BaseInformation,
    SaveAndNext,
}

impl Endpoint {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "auth/login",
            Self::Callback => "auth/callback",
            Self::UserInfo => "auth/user_info",
            Self::Sessions => "sessions",
            Self::SessionContent => "sessions/{id}",
            Self::BaseInformation => "base_information",
            Self::SaveAndNext => "options/save_and_next/{id}",
        }
    }
}

/// Classify an error response into the client taxonomy.
///
/// The backend answers a stale pair or a finished session on the submission
/// endpoint with 400, so there 400 means conflict. A rejected authorization
/// code on the callback is an auth failure whatever the status.
pub fn classify_status(endpoint: Endpoint, status: StatusCode, body: &str) -> ClientError {
    let detail = format!("{} returned {}: {}", endpoint.as_str(), status, summarize(body));

    match (endpoint, status) {
        (_, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => ClientError::Auth(detail),
        (Endpoint::Callback, s) if s.is_client_error() => ClientError::Auth(detail),
        (_, StatusCode::NOT_FOUND) => ClientError::NotFound(detail),
        (_, StatusCode::CONFLICT) => ClientError::Conflict(detail),
        (Endpoint::SaveAndNext, StatusCode::BAD_REQUEST) => ClientError::Conflict(detail),
        _ => ClientError::Network(detail),
    }
}

// Error bodies can be whole HTML pages.
fn summarize(body: &str) -> String {
    const MAX: usize = 200;
    let body = body.trim();
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}...")
    }
}
