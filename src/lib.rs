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


//! Client library for the StreamOne ION commerce platform
//!
//! The platform exposes two API generations and this crate wraps both
//! behind one [`IonClient`]:
//!
//! * **v3 (token generation)**: bearer-token authenticated, cursor- or
//!   offset-paginated resource endpoints (customers, subscriptions, orders,
//!   products, reports). The access token is validated before every call
//!   and refreshed through the OAuth token endpoint when rejected, with the
//!   new pair persisted back to the credential file.
//! * **v1 (key/secret generation)**: Basic-auth invoicing and customer
//!   endpoints with the legacy bracketed query syntax. No token lifecycle.
//!
//! Construction starts from a JSON credential file (see [`config`]); either
//! generation may be configured alone, and calls into an unconfigured
//! generation fail with a `Configuration` error before any network I/O.
//!
//! ```rust,no_run
//! use streamone_ion::{IonClient, api::orders::ListOrdersOptions};
//!
//! # async fn example() -> streamone_ion::Result<()> {
//! let client = IonClient::from_config_path("config.json").await?;
//!
//! let mut orders = client
//!     .list_account_orders(&ListOrdersOptions {
//!         page_size: Some(50),
//!         status: Some("PROCESSING".into()),
//!     })
//!     .await?;
//! while let Some(order) = orders.try_next().await? {
//!     println!("{}", order);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod v1;

// Re-export the types almost every consumer touches
pub use api::auth::{KeyCredentials, TokenCredentials};
pub use api::client::{ClientConfig, IonClient};
pub use api::pagination::{PageStream, PageStyle};
pub use api::response::NotFoundBehavior;
pub use config::CredentialFile;
pub use error::{IonError, Result};
