//! Tokens and identity returned by the OAuth-style login flow.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token set issued by `/auth/callback`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds from issue
    #[serde(default)]
    pub expires_in: i64,
}

impl TokenBundle {
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at + Duration::seconds(self.expires_in)
    }
}

// Tokens stay out of Debug output so they cannot leak through `{:?}` in logs.
impl std::fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBundle")
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Identity of the logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub email: String,

    #[serde(default, alias = "preferredUsername")]
    pub preferred_username: Option<String>,
}

impl UserInfo {
    /// Best human-facing name available.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.name.as_str()).filter(|s| !s.is_empty()))
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_at() {
        let tokens = TokenBundle {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            id_token: "it".into(),
            scope: "openid".into(),
            token_type: "Bearer".into(),
            expires_in: 3600,
        };
        let issued = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            tokens.expires_at(issued).to_rfc3339(),
            "2025-01-01T01:00:00+00:00"
        );
    }

    #[test]
    fn test_debug_hides_tokens() {
        let tokens = TokenBundle {
            access_token: "super-secret-access".into(),
            refresh_token: "super-secret-refresh".into(),
            id_token: String::new(),
            scope: String::new(),
            token_type: "Bearer".into(),
            expires_in: 60,
        };
        let debug = format!("{tokens:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_user_info_accepts_camel_case_aliases() {
        let user: UserInfo = serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "name": "lin",
            "displayName": "Lin W.",
            "email": "lin@example.com",
            "preferredUsername": "linw"
        }))
        .unwrap();
        assert_eq!(user.label(), "Lin W.");
        assert_eq!(user.preferred_username.as_deref(), Some("linw"));
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let user = UserInfo {
            id: "u-7".into(),
            ..Default::default()
        };
        assert_eq!(user.label(), "u-7");
    }
}
