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


//! Customers resource (v3)
//!
//! # API Endpoints
//! - `GET /api/v3/accounts/{account}/customers` (cursor-paginated)
//! - `GET /api/v3/accounts/{account}/customers/{customer}`
//!
//! 404 on this surface means "no such customer(s)" and classifies as an
//! empty result, for the point lookup as well as the listing. Records carry
//! a long resource path in `name`; both operations attach the trailing
//! segment as `id`.

use serde_json::Value;

use crate::api::attach_short_id;
use crate::api::client::IonClient;
use crate::api::pagination::{PageStream, PageStyle};
use crate::api::response::NotFoundBehavior;
use crate::error::Result;

/// Recognized filters for [`IonClient::list_customers`].
///
/// Every field maps to a fixed wire parameter; there is no free-form
/// filter pass-through on this endpoint.
#[derive(Debug, Clone, Default)]
pub struct ListCustomersOptions {
    /// Results per page; the server picks a default when unset
    pub page_size: Option<u32>,
    /// Filter by customer email (`filter.customerEmail`)
    pub customer_email: Option<String>,
    /// Filter by language code (`filter.languageCode`)
    pub language_code: Option<String>,
    /// Filter by customer status (`filter.customerStatus`)
    pub customer_status: Option<String>,
    /// Filter by customer name (`filter.customerName`)
    pub customer_name: Option<String>,
}

impl ListCustomersOptions {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(page_size) = self.page_size {
            params.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(ref email) = self.customer_email {
            params.push(("filter.customerEmail".to_string(), email.clone()));
        }
        if let Some(ref language) = self.language_code {
            params.push(("filter.languageCode".to_string(), language.clone()));
        }
        if let Some(ref status) = self.customer_status {
            params.push(("filter.customerStatus".to_string(), status.clone()));
        }
        if let Some(ref name) = self.customer_name {
            params.push(("filter.customerName".to_string(), name.clone()));
        }
        params
    }
}

impl IonClient {
    /// List customers as a lazy paginated stream.
    ///
    /// # Errors
    /// Credential validation/refresh failures surface here before any page
    /// is fetched; per-page classified failures surface from the stream.
    pub async fn list_customers(&self, options: &ListCustomersOptions) -> Result<PageStream> {
        let stream = self
            .v3_paginate(
                &self.v3_account_path("/customers"),
                options.to_params(),
                PageStyle::cursor("customers"),
                NotFoundBehavior::EmptyObject,
            )
            .await?;
        Ok(stream.with_item_map(attach_short_id))
    }

    /// Fetch a single customer by its short ID.
    ///
    /// An unknown ID yields an empty record, mirroring the listing's 404
    /// behavior.
    pub async fn get_customer(&self, customer_id: &str) -> Result<Value> {
        let record = self
            .v3_get(
                &self.v3_account_path(&format!("/customers/{}", customer_id)),
                &[],
                NotFoundBehavior::EmptyObject,
            )
            .await?;
        Ok(attach_short_id(record))
    }
}
