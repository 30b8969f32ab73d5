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


//! Durable credential file
//!
//! The client is configured from a single JSON file holding the account
//! identifier and the credentials for one or both API generations:
//!
//! ```json
//! {
//!     "v1": {
//!         "api_key": "your_v1_api_key",
//!         "api_secret": "your_v1_api_secret"
//!     },
//!     "v3": {
//!         "access_token": "your_v3_access_token",
//!         "refresh_token": "your_v3_refresh_token"
//!     },
//!     "accountid": "your_account_id"
//! }
//! ```
//!
//! The file is read once at client construction. Whenever the v3 token pair
//! is refreshed the file is rewritten with a full read-modify-write that
//! preserves every field this crate does not own, so the file can double as
//! application configuration. Writes go through a temp file in the same
//! directory followed by a rename, so a crash mid-write never leaves a
//! truncated credential file behind.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::api::auth::{KeyCredentials, TokenCredentials};
use crate::error::{IonError, Result};

/// Handle to the JSON credential file backing a client session.
///
/// Holds the path and the document as parsed at load time. Typed accessors
/// pull the sections this crate understands; the rest of the document is
/// carried along untouched.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
    raw: Map<String, Value>,
}

impl CredentialFile {
    /// Load and parse the credential file at `path`.
    ///
    /// # Errors
    /// Returns `Configuration` if the file cannot be read or is not a JSON
    /// object.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            IonError::Configuration(format!(
                "cannot read credential file {}: {}",
                path.display(),
                e
            ))
        })?;
        let doc: Value = serde_json::from_str(&contents).map_err(|e| {
            IonError::Configuration(format!(
                "credential file {} is not valid JSON: {}",
                path.display(),
                e
            ))
        })?;
        let raw = match doc {
            Value::Object(map) => map,
            _ => {
                return Err(IonError::Configuration(format!(
                    "credential file {} must contain a JSON object",
                    path.display()
                )))
            }
        };
        debug!(path = %path.display(), "loaded credential file");
        Ok(Self { path, raw })
    }

    /// Path the file was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The configured account identifier, if present.
    pub fn account_id(&self) -> Option<&str> {
        self.raw.get("accountid").and_then(Value::as_str)
    }

    /// The v1 key/secret pair, if the `v1` section is present.
    ///
    /// # Errors
    /// A present but malformed section is a `Configuration` error rather
    /// than a silent `None`.
    pub fn v1_credentials(&self) -> Result<Option<KeyCredentials>> {
        self.section("v1")
    }

    /// The v3 access/refresh token pair, if the `v3` section is present.
    pub fn v3_credentials(&self) -> Result<Option<TokenCredentials>> {
        self.section("v3")
    }

    fn section<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.raw.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                IonError::Configuration(format!(
                    "credential file {}: invalid \"{}\" section: {}",
                    self.path.display(),
                    key,
                    e
                ))
            }),
        }
    }

    /// Persist a refreshed v3 token pair.
    ///
    /// Re-reads the file so concurrent edits to unrelated fields are not
    /// clobbered, replaces only `v3.access_token` and `v3.refresh_token`,
    /// and writes the document back atomically.
    pub async fn store_token_pair(&self, tokens: &TokenCredentials) -> Result<()> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let mut doc: Value = serde_json::from_str(&contents).map_err(|e| {
            IonError::Configuration(format!(
                "credential file {} is not valid JSON: {}",
                self.path.display(),
                e
            ))
        })?;

        let section = doc
            .as_object_mut()
            .ok_or_else(|| {
                IonError::Configuration(format!(
                    "credential file {} must contain a JSON object",
                    self.path.display()
                ))
            })?
            .entry("v3")
            .or_insert_with(|| Value::Object(Map::new()));
        if !section.is_object() {
            return Err(IonError::Configuration(format!(
                "credential file {}: \"v3\" is not an object",
                self.path.display()
            )));
        }
        section["access_token"] = Value::String(tokens.access_token.clone());
        section["refresh_token"] = Value::String(tokens.refresh_token.clone());

        write_atomic(&self.path, &doc).await?;
        debug!(path = %self.path.display(), "persisted refreshed token pair");
        Ok(())
    }
}

/// Write a JSON document to `path` via temp file + rename.
async fn write_atomic(path: &Path, doc: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(doc)
        .map_err(|e| IonError::invalid_response(format!("serializing credential file: {}", e)))?;

    let dir = path.parent().ok_or_else(|| {
        IonError::Configuration("credential file path has no parent directory".to_string())
    })?;
    let tmp_path = dir.join(format!(".credentials.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, json.as_bytes()).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}
