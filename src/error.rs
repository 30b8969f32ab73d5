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


//! Error types for the StreamOne ION client
//!
//! One error enum covers both API generations. The service-facing variants
//! (`BadRequest` through `Unclassified`) are produced exclusively by the
//! response classifier in [`crate::api::response`] and carry the raw service
//! body text verbatim; nothing in this crate rewrites service messages.
//! `Configuration` is raised before any network I/O when credentials for the
//! requested API generation are missing or malformed.

use thiserror::Error;

/// Result type alias using our IonError type
pub type Result<T> = std::result::Result<T, IonError>;

/// Main error type for the StreamOne ION client
#[derive(Error, Debug)]
pub enum IonError {
    // ===== Classified service failures =====

    /// The request was invalid or cannot be processed (HTTP 400)
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failed, e.g. invalid credentials or expired token (HTTP 401)
    #[error("authentication failed: {0}")]
    Unauthenticated(String),

    /// The caller lacks permission for this action (HTTP 403)
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// The requested resource was not found (HTTP 404, where the endpoint
    /// treats 404 as an error rather than an empty result)
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Server-side failure (HTTP 5xx)
    #[error("server error: {0}")]
    ServerError(String),

    /// Any status code the classifier has no mapping for
    #[error("unclassified response (status {status}): {message}")]
    Unclassified { status: u16, message: String },

    // ===== Client-side failures =====

    /// Missing or invalid credential setup, detected before any network call
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The service answered with success but the body could not be decoded
    /// or lacked a required field
    #[error("invalid API response: {message}")]
    InvalidResponse {
        message: String,
        /// Response body snippet for debugging
        body: Option<String>,
    },

    // ===== Transport / local I/O =====

    /// Transport-level failure (connection, TLS, timeout)
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Local file I/O failure (credential file, report/invoice downloads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IonError {
    /// True for failures that mean the caller has to fix credentials
    /// before retrying anything.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            IonError::Unauthenticated(_) | IonError::Unauthorized(_) | IonError::Configuration(_)
        )
    }

    /// HTTP status behind a classified failure, if any.
    ///
    /// `Unclassified` reports its actual status; client-side and transport
    /// errors return `None`.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            IonError::BadRequest(_) => Some(400),
            IonError::Unauthenticated(_) => Some(401),
            IonError::Unauthorized(_) => Some(403),
            IonError::NotFound(_) => Some(404),
            IonError::ServerError(_) => Some(500),
            IonError::Unclassified { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Shorthand for an `InvalidResponse` without a captured body.
    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        IonError::InvalidResponse {
            message: message.into(),
            body: None,
        }
    }
}
