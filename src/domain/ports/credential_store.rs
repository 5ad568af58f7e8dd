/// Credential persistence port.
///
/// Replaces browser local storage: holds the access token and the user-info
/// blob between CLI invocations.
use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::models::UserInfo;

/// Everything the client persists about the logged-in user.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub access_token: String,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
    /// RFC 3339 expiry, when the server reported a lifetime
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl std::fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("user_info", &self.user_info)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Synchronous key-value style store; the data is tiny and local.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredCredentials>>;

    fn save(&self, credentials: &StoredCredentials) -> Result<()>;

    /// Removes everything; succeeds when nothing was stored.
    fn clear(&self) -> Result<()>;
}
