// StreamOne ION client library for Rust
// Copyright (C) 2025 StreamOne ION SDK contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! HTTP client for the StreamOne ION platform
//!
//! [`IonClient`] is the single entry point for both API generations. It is
//! constructed from the JSON credential file, holds the immutable v1
//! key/secret pair and the mutable v3 token pair, and exposes one `impl`
//! block per resource family from the sibling modules.
//!
//! # Credential lifecycle
//!
//! Every v3 resource call starts with [`ensure_valid_token`]: validate the
//! current access token, exchange the refresh token if the service rejects
//! it, persist the new pair to the credential file, and hand the caller a
//! token that was accepted moments ago. This runs unconditionally per call,
//! trading a validation round-trip on every request for never operating on
//! a stale token. The token pair lives behind a `tokio::sync::Mutex` that
//! stays held across the whole validate-then-exchange sequence, so
//! concurrent callers trigger at most one exchange and the last persisted
//! pair is always a pair the service issued.
//!
//! v1 calls authenticate with a static Basic header and never touch the
//! refresh machinery.
//!
//! [`ensure_valid_token`]: IonClient::ensure_valid_token

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api::auth::{self, KeyCredentials, TokenCredentials};
use crate::api::pagination::{PageRequest, PageStream, PageStyle};
use crate::api::response::{classify_response, NotFoundBehavior};
use crate::config::CredentialFile;
use crate::error::{IonError, Result};

/// Production base URL of the v1 (key/secret) generation.
pub const DEFAULT_V1_BASE_URL: &str = "https://ion.tdsynnex.com/api/v1";

/// Production base URL of the v3 (token) generation. Resource paths and the
/// OAuth endpoints hang off this root.
pub const DEFAULT_V3_BASE_URL: &str = "https://ion.tdsynnex.com";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for IonClient
/// Provides a builder pattern for client customization
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub v1_base_url: String,
    pub v3_base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            v1_base_url: DEFAULT_V1_BASE_URL.to_string(),
            v3_base_url: DEFAULT_V3_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("streamone-ion/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for ClientConfig
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Point both generations at the same host (testing against a local
    /// stand-in service).
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');
        self.config.v1_base_url = format!("{}/api/v1", trimmed);
        self.config.v3_base_url = trimmed.to_string();
        self
    }

    pub fn v1_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.v1_base_url = url.into();
        self
    }

    pub fn v3_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.v3_base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Client session for the StreamOne ION platform.
///
/// One instance per credential file. Cheap to share behind an `Arc`; all
/// methods take `&self`.
///
/// # Example
/// ```rust,no_run
/// use streamone_ion::{IonClient, api::customers::ListCustomersOptions};
///
/// # async fn example() -> streamone_ion::Result<()> {
/// let client = IonClient::from_config_path("config.json").await?;
///
/// let mut customers = client.list_customers(&ListCustomersOptions::default()).await?;
/// while let Some(customer) = customers.try_next().await? {
///     println!("{}", customer["id"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IonClient {
    /// Underlying HTTP client
    http: reqwest::Client,
    /// Account identifier baked into every v3 resource path
    account_id: String,
    config: ClientConfig,
    /// Durable backing store, rewritten whenever the token pair refreshes
    credential_file: CredentialFile,
    /// v1 generation credentials (immutable)
    v1: Option<KeyCredentials>,
    /// v3 generation credentials; the mutex is held across the whole
    /// validate-then-exchange sequence
    v3: Option<Arc<Mutex<TokenCredentials>>>,
}

impl IonClient {
    /// Build a client from the credential file at `path` with default
    /// configuration.
    ///
    /// # Errors
    /// Returns `Configuration` if the file is unreadable, lacks
    /// `accountid`, or configures neither generation.
    pub async fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(path, ClientConfig::default()).await
    }

    /// Build a client with custom configuration (base URLs, timeout,
    /// user agent).
    pub async fn with_config(path: impl AsRef<Path>, config: ClientConfig) -> Result<Self> {
        let credential_file = CredentialFile::load(path.as_ref()).await?;

        let account_id = credential_file
            .account_id()
            .ok_or_else(|| {
                IonError::Configuration(
                    "credential file must include an \"accountid\" field".to_string(),
                )
            })?
            .to_string();

        let v1 = credential_file.v1_credentials()?;
        let v3 = credential_file.v3_credentials()?;
        if v1.is_none() && v3.is_none() {
            return Err(IonError::Configuration(
                "credential file must include either v1 or v3 credentials. Example structure:\n\
                 {\n\
                 \x20   \"v1\": {\n\
                 \x20       \"api_key\": \"your_v1_api_key\",\n\
                 \x20       \"api_secret\": \"your_v1_api_secret\"\n\
                 \x20   },\n\
                 \x20   \"v3\": {\n\
                 \x20       \"access_token\": \"your_v3_access_token\",\n\
                 \x20       \"refresh_token\": \"your_v3_refresh_token\"\n\
                 \x20   },\n\
                 \x20   \"accountid\": \"your_account_id\"\n\
                 }"
                .to_string(),
            ));
        }

        for (generation, base_url) in [("v1", &config.v1_base_url), ("v3", &config.v3_base_url)] {
            url::Url::parse(base_url).map_err(|e| {
                IonError::Configuration(format!(
                    "invalid {} base URL \"{}\": {}",
                    generation, base_url, e
                ))
            })?;
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                IonError::Configuration(format!("invalid user agent: {}", e))
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            account_id,
            config,
            credential_file,
            v1,
            v3: v3.map(|tokens| Arc::new(Mutex::new(tokens))),
        })
    }

    /// The configured account identifier.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Snapshot of the current v3 token pair, if that generation is
    /// configured.
    pub async fn token_credentials(&self) -> Option<TokenCredentials> {
        match &self.v3 {
            Some(state) => Some(state.lock().await.clone()),
            None => None,
        }
    }

    // ========================================================================
    // Credential lifecycle (v3)
    // ========================================================================

    /// Make sure the v3 access token is currently accepted, refreshing and
    /// persisting a new pair if it is not. Returns the token to use.
    ///
    /// Runs before every v3 resource call. The store mutex is held for the
    /// whole validate-then-exchange sequence, so racing callers wait here
    /// instead of issuing duplicate exchanges.
    ///
    /// # Errors
    /// `Configuration` when v3 is not configured; otherwise the classified
    /// failure of the exchange call. The refresh is a single attempt.
    pub(crate) async fn ensure_valid_token(&self) -> Result<String> {
        let state = self.v3_state()?;
        let mut tokens = state.lock().await;

        if auth::validate_access(&self.http, &self.config.v3_base_url, &tokens.access_token)
            .await?
        {
            return Ok(tokens.access_token.clone());
        }

        debug!(account_id = %self.account_id, "access token rejected, refreshing");
        let refreshed = auth::exchange_refresh_token(
            &self.http,
            &self.config.v3_base_url,
            &tokens.refresh_token,
        )
        .await?;

        tokens.access_token = refreshed.access_token;
        if let Some(refresh_token) = refreshed.refresh_token.filter(|t| !t.is_empty()) {
            tokens.refresh_token = refresh_token;
        }
        self.credential_file.store_token_pair(&tokens).await?;
        info!(account_id = %self.account_id, "access token refreshed");

        Ok(tokens.access_token.clone())
    }

    fn v3_state(&self) -> Result<&Arc<Mutex<TokenCredentials>>> {
        self.v3.as_ref().ok_or_else(|| {
            IonError::Configuration("v3 credentials are not configured".to_string())
        })
    }

    fn v1_credentials(&self) -> Result<&KeyCredentials> {
        self.v1.as_ref().ok_or_else(|| {
            IonError::Configuration("v1 credentials are not configured".to_string())
        })
    }

    // ========================================================================
    // Request building
    // ========================================================================

    fn bearer_headers(&self, access_token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token))
                .map_err(|e| IonError::Configuration(format!("invalid access token: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn basic_headers(&self) -> Result<HeaderMap> {
        let credentials = self.v1_credentials()?;
        let token = general_purpose::STANDARD.encode(format!(
            "{}:{}",
            credentials.api_key, credentials.api_secret
        ));
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", token))
                .map_err(|e| IonError::Configuration(format!("invalid api key/secret: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Resource path under the account root, e.g. `/customers` becomes
    /// `/api/v3/accounts/{account_id}/customers`.
    pub(crate) fn v3_account_path(&self, suffix: &str) -> String {
        format!("/api/v3/accounts/{}{}", self.account_id, suffix)
    }

    /// Single-shot classified GET against the v3 generation.
    pub(crate) async fn v3_get(
        &self,
        path: &str,
        params: &[(String, String)],
        not_found: NotFoundBehavior,
    ) -> Result<Value> {
        let access_token = self.ensure_valid_token().await?;
        let headers = self.bearer_headers(&access_token)?;
        let response = self
            .http
            .get(format!("{}{}", self.config.v3_base_url, path))
            .headers(headers)
            .query(params)
            .send()
            .await?;
        classify_response(response, not_found).await
    }

    /// Single-shot classified POST with a JSON body against the v3
    /// generation.
    pub(crate) async fn v3_post_json(
        &self,
        path: &str,
        payload: &Value,
        not_found: NotFoundBehavior,
    ) -> Result<Value> {
        let access_token = self.ensure_valid_token().await?;
        let headers = self.bearer_headers(&access_token)?;
        let response = self
            .http
            .post(format!("{}{}", self.config.v3_base_url, path))
            .headers(headers)
            .json(payload)
            .send()
            .await?;
        classify_response(response, not_found).await
    }

    /// Start a lazy paginated listing against the v3 generation.
    ///
    /// The credential check runs once, up front; every page of the
    /// resulting stream reuses the token that was just validated.
    pub(crate) async fn v3_paginate(
        &self,
        path: &str,
        params: Vec<(String, String)>,
        style: PageStyle,
        not_found: NotFoundBehavior,
    ) -> Result<PageStream> {
        let access_token = self.ensure_valid_token().await?;
        let headers = self.bearer_headers(&access_token)?;
        Ok(PageStream::new(
            PageRequest {
                client: self.http.clone(),
                url: format!("{}{}", self.config.v3_base_url, path),
                headers,
                params,
                not_found,
            },
            style,
        ))
    }

    /// Single-shot classified GET against the v1 generation.
    ///
    /// `path_and_query` carries a pre-assembled query string: the v1
    /// surface's bracketed filter syntax is built by the caller, not by
    /// reqwest's serializer. 404 is always a `NotFound` failure on this
    /// generation.
    pub(crate) async fn v1_get(&self, path_and_query: &str) -> Result<Value> {
        let headers = self.basic_headers()?;
        let response = self
            .http
            .get(format!("{}{}", self.config.v1_base_url, path_and_query))
            .headers(headers)
            .send()
            .await?;
        classify_response(response, NotFoundBehavior::Error).await
    }

    /// Single-shot classified form POST against the v1 generation.
    pub(crate) async fn v1_post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<Value> {
        let headers = self.basic_headers()?;
        let response = self
            .http
            .post(format!("{}{}", self.config.v1_base_url, path))
            .headers(headers)
            .form(form)
            .send()
            .await?;
        classify_response(response, NotFoundBehavior::Error).await
    }

    /// Plain download of an unauthenticated URL (pre-signed invoice file
    /// links).
    pub(crate) async fn fetch_bytes(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(Some(response.bytes().await?.to_vec()))
    }
}
