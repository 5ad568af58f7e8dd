//! Shared state for one CLI invocation.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::domain::models::Config;
use crate::domain::ports::CredentialStore;
use crate::infrastructure::api::HttpMajorApi;
use crate::infrastructure::credentials::{AuthContext, FileCredentialStore};

pub struct CliContext {
    pub config: Config,
    pub api: Arc<HttpMajorApi>,
    pub auth: AuthContext,
}

impl CliContext {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the
    /// credentials file is unreadable.
    pub fn new(config: Config) -> Result<Self> {
        let api = HttpMajorApi::new(&config.api).context("Failed to create API client")?;
        let store: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(&config.credentials.path));
        let auth = AuthContext::init(store).context("Failed to read stored credentials")?;

        Ok(Self {
            config,
            api: Arc::new(api),
            auth,
        })
    }
}
