use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::models::{TokenBundle, UserInfo};
use crate::domain::ports::{CredentialStore, StoredCredentials};

/// Logged-in state shared by every command.
///
/// Reads the persisted token once on `init`; `clear` is the only way to log
/// out and is also what `Auth` failures trigger.
pub struct AuthContext {
    store: Arc<dyn CredentialStore>,
    current: Option<StoredCredentials>,
}

impl AuthContext {
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn init(store: Arc<dyn CredentialStore>) -> Result<Self> {
        let current = store.load()?;
        tracing::debug!(logged_in = current.is_some(), "auth context initialized");
        Ok(Self { store, current })
    }

    pub const fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.current.as_ref().and_then(|c| c.user_info.as_ref())
    }

    /// Token for bearer-authenticated calls.
    ///
    /// # Errors
    /// `Auth` when nobody is logged in or the stored token has expired.
    pub fn access_token(&self) -> ClientResult<&str> {
        self.access_token_at(Utc::now())
    }

    fn access_token_at(&self, now: DateTime<Utc>) -> ClientResult<&str> {
        let credentials = self
            .current
            .as_ref()
            .ok_or_else(|| ClientError::Auth("not logged in".to_string()))?;

        let expired = credentials
            .expires_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .is_some_and(|at| at.with_timezone(&Utc) <= now);
        if expired {
            return Err(ClientError::Auth("stored token has expired".to_string()));
        }

        Ok(&credentials.access_token)
    }

    /// Persists a fresh login.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn save_login(&mut self, tokens: &TokenBundle, user: Option<UserInfo>) -> Result<()> {
        let expires_at = (tokens.expires_in > 0).then(|| tokens.expires_at(Utc::now()).to_rfc3339());
        let credentials = StoredCredentials {
            access_token: tokens.access_token.clone(),
            user_info: user,
            expires_at,
        };
        self.store.save(&credentials)?;
        self.current = Some(credentials);
        Ok(())
    }

    /// Replaces the cached user info, keeping the token.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn update_user(&mut self, user: UserInfo) -> Result<()> {
        if let Some(credentials) = self.current.as_mut() {
            credentials.user_info = Some(user);
            self.store.save(credentials)?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if the store cannot be cleared.
    pub fn clear(&mut self) -> Result<()> {
        self.current = None;
        self.store.clear()?;
        tracing::info!("stored credentials cleared");
        Ok(())
    }
}
