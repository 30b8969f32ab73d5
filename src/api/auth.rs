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


//! Session credentials and the token lifecycle calls
//!
//! Two credential generations exist side by side. The v1 key/secret pair is
//! immutable for the lifetime of the process. The v3 access/refresh pair is
//! mutable: before every v3 resource call the access token is validated
//! against `/oauth/validateAccess`, and a rejected token is exchanged at
//! `/oauth/token` for a fresh pair. The exchange is a single attempt; a
//! failing exchange surfaces as a classified failure for the invoked
//! operation only.
//!
//! The locking and persistence around a refresh live in
//! [`crate::api::client`]; this module only owns the credential types and
//! the two wire calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::response::{classify_response, NotFoundBehavior};
use crate::error::{IonError, Result};

/// Grant type sent on every token exchange.
const TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Fixed redirect target the token endpoint expects.
const TOKEN_REDIRECT_URI: &str = "http://localhost/";

/// Immutable v1 key/secret pair (legacy generation, Basic auth).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyCredentials {
    pub api_key: String,
    pub api_secret: String,
}

/// Mutable v3 access/refresh token pair (token generation, Bearer auth).
///
/// Mutated only by the refresh step; persisted to the credential file
/// whenever it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCredentials {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token endpoint response.
///
/// The service returns both tokens on a successful exchange. A missing or
/// empty `refresh_token` keeps the previous one.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Ask the service whether `access_token` is still accepted.
///
/// Any success status counts as accepted; any other answer means the token
/// has to be exchanged. Transport failures propagate.
pub async fn validate_access(
    http: &reqwest::Client,
    base_url: &str,
    access_token: &str,
) -> Result<bool> {
    let response = http
        .post(format!("{}/oauth/validateAccess", base_url))
        .form(&[("access_token", access_token)])
        .send()
        .await?;
    Ok(response.status().is_success())
}

/// Exchange the refresh token for a new access/refresh pair.
///
/// # Errors
/// A non-success answer from the token endpoint is classified like any
/// other response and returned as the corresponding failure; there is no
/// retry.
pub async fn exchange_refresh_token(
    http: &reqwest::Client,
    base_url: &str,
    refresh_token: &str,
) -> Result<TokenResponse> {
    debug!("exchanging refresh token for a new token pair");
    let response = http
        .post(format!("{}/oauth/token", base_url))
        .form(&[
            ("grant_type", TOKEN_GRANT_TYPE),
            ("redirect_uri", TOKEN_REDIRECT_URI),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let data = classify_response(response, NotFoundBehavior::Error).await?;
    serde_json::from_value(data).map_err(|e| {
        IonError::invalid_response(format!("undecodable token endpoint response: {}", e))
    })
}
