//! HTTP adapter for the major-choice backend
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::errors::{classify_status, Endpoint};
use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::models::{
    ApiConfig, BaseInformation, MajorChoiceRequest, OperationEnvelope, OperationResult,
    SessionContent, TokenBundle, UserInfo,
};
use crate::domain::ports::{DecidedPair, MajorApi};

/// reqwest-backed implementation of [`MajorApi`].
///
/// Features:
/// - Connection pooling and reuse (via `reqwest::Client`)
/// - Transport timeout from configuration
/// - Status classification into the client error taxonomy
///
/// No retries: a failed call is surfaced so the user can retry explicitly.
#[derive(Debug, Clone)]
pub struct HttpMajorApi {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,

    /// Base URL without trailing slash
    base_url: String,
}

impl HttpMajorApi {
    /// Create a client for the given backend.
    ///
    /// # Errors
    /// `Network` when the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `path` followed by the session id as a single percent-encoded segment.
    fn session_url(&self, path: &str, session_id: &str) -> ClientResult<Url> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| ClientError::InvalidState(format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidState("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(session_id);
        Ok(url)
    }

    /// Send a request and return the response if its status is a success.
    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint = endpoint.as_str(), error = %e, "request failed");
            ClientError::Network(format!("{}: {e}", endpoint.as_str()))
        })?;

        let status = response.status();
        debug!(endpoint = endpoint.as_str(), %status, "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());
        let error = classify_status(endpoint, status, &body);
        warn!(endpoint = endpoint.as_str(), %status, kind = error.kind(), "API error");
        Err(error)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.send(endpoint, request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Endpoints that answer with a bare string may send it JSON-quoted or raw.
    async fn send_string(&self, endpoint: Endpoint, request: RequestBuilder) -> ClientResult<String> {
        let response = self.send(endpoint, request).await?;
        let text = response.text().await?;
        let value = serde_json::from_str::<String>(&text).unwrap_or_else(|_| text.trim().to_string());
        if value.is_empty() {
            return Err(ClientError::InconsistentState(format!(
                "{} returned an empty body",
                endpoint.as_str()
            )));
        }
        Ok(value)
    }
}

#[async_trait]
impl MajorApi for HttpMajorApi {
    #[instrument(skip(self))]
    async fn request_login_url(&self) -> ClientResult<String> {
        let request = self.http_client.post(self.url("/auth/login"));
        self.send_string(Endpoint::Login, request).await
    }

    #[instrument(skip(self, code, state))]
    async fn exchange_code(&self, code: &str, state: &str) -> ClientResult<TokenBundle> {
        let request = self
            .http_client
            .post(self.url("/auth/callback"))
            .json(&json!({ "code": code, "state": state }));
        self.send_json(Endpoint::Callback, request).await
    }

    #[instrument(skip(self, access_token))]
    async fn fetch_user_info(&self, access_token: &str) -> ClientResult<UserInfo> {
        let request = self
            .http_client
            .get(self.url("/auth/user_info"))
            .bearer_auth(access_token);
        self.send_json(Endpoint::UserInfo, request).await
    }

    #[instrument(skip(self, info, access_token))]
    async fn submit_base_information(
        &self,
        info: &BaseInformation,
        access_token: &str,
    ) -> ClientResult<String> {
        let missing_fields = info.missing_fields();
        if !missing_fields.is_empty() {
            debug!(?missing_fields, "base information incomplete, not submitting");
            return Err(ClientError::Validation { missing_fields });
        }

        let request = self
            .http_client
            .post(self.url("/base_information"))
            .bearer_auth(access_token)
            .json(info);
        self.send_string(Endpoint::BaseInformation, request).await
    }

    #[instrument(skip(self, access_token))]
    async fn fetch_session_ids(&self, access_token: &str) -> ClientResult<Vec<String>> {
        let request = self
            .http_client
            .get(self.url("/sessions"))
            .bearer_auth(access_token);
        // The backend answers `null` for a user with no sessions.
        let ids: Option<Vec<String>> = self.send_json(Endpoint::Sessions, request).await?;
        Ok(ids.unwrap_or_default())
    }

    #[instrument(skip(self, access_token))]
    async fn fetch_session_content(
        &self,
        session_id: &str,
        access_token: &str,
    ) -> ClientResult<SessionContent> {
        let request = self
            .http_client
            .get(self.session_url("/sessions", session_id)?)
            .bearer_auth(access_token);
        self.send_json(Endpoint::SessionContent, request).await
    }

    #[instrument(skip(self, decided, access_token), fields(bootstrap = decided.is_none()))]
    async fn submit_choice_and_advance(
        &self,
        session_id: &str,
        decided: Option<&DecidedPair>,
        access_token: &str,
    ) -> ClientResult<OperationResult> {
        let body = match decided {
            Some(d) => MajorChoiceRequest::decided(&d.pair, &d.winner_id).ok_or_else(|| {
                ClientError::InvalidState(format!(
                    "winner {} is not part of the submitted pair",
                    d.winner_id
                ))
            })?,
            None => MajorChoiceRequest::next_step(),
        };

        let request = self
            .http_client
            .post(self.session_url("/options/save_and_next", session_id)?)
            .bearer_auth(access_token)
            .json(&body);
        let envelope: OperationEnvelope = self.send_json(Endpoint::SaveAndNext, request).await?;
        debug!(operation = envelope.operation.as_str(), "operation received");
        envelope.into_result()
    }
}
