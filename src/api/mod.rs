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


//! Token-generation (v3) API surface
//!
//! The v3 generation authenticates with a bearer access token that is
//! validated before every resource call and exchanged via the refresh token
//! when rejected. Resource modules contribute `impl IonClient` blocks;
//! the shared machinery lives in [`client`] (request building and the
//! credential lifecycle), [`response`] (status classification) and
//! [`pagination`] (the lazy page walker).

pub mod auth;
pub mod client;
pub mod customers;
pub mod orders;
pub mod pagination;
pub mod products;
pub mod reports;
pub mod response;
pub mod subscriptions;

// Re-export commonly used types
pub use auth::{KeyCredentials, TokenCredentials};
pub use client::{ClientConfig, IonClient};
pub use pagination::{PageStream, PageStyle};
pub use response::NotFoundBehavior;

use serde_json::Value;

/// Derive the short resource ID from a long `name` path and attach it as an
/// `id` field (`accounts/123/customers/456` → `"456"`).
///
/// Records without a string `name` pass through unchanged.
pub(crate) fn attach_short_id(mut record: Value) -> Value {
    let short = record
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .map(str::to_owned);
    if let (Some(short), Some(obj)) = (short, record.as_object_mut()) {
        obj.insert("id".to_string(), Value::String(short));
    }
    record
}
