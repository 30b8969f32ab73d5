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


//! Orders resource (v3)
//!
//! # API Endpoints
//! - `GET /api/v3/accounts/{account}/orders` (cursor-paginated)
//! - `GET /api/v3/accounts/{account}/customers/{customer}/orders`
//!   (cursor-paginated)
//!
//! 404 classifies as an empty result on both listings.

use crate::api::client::IonClient;
use crate::api::pagination::{PageStream, PageStyle};
use crate::api::response::NotFoundBehavior;
use crate::error::Result;

/// Recognized filters for the order listings.
#[derive(Debug, Clone, Default)]
pub struct ListOrdersOptions {
    /// Results per page; the server picks a default when unset
    pub page_size: Option<u32>,
    /// Filter by order status (`status`)
    pub status: Option<String>,
}

impl ListOrdersOptions {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(page_size) = self.page_size {
            params.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(ref status) = self.status {
            params.push(("status".to_string(), status.clone()));
        }
        params
    }
}

impl IonClient {
    /// List the account's orders as a lazy paginated stream.
    pub async fn list_account_orders(&self, options: &ListOrdersOptions) -> Result<PageStream> {
        self.v3_paginate(
            &self.v3_account_path("/orders"),
            options.to_params(),
            PageStyle::cursor("orders"),
            NotFoundBehavior::EmptyObject,
        )
        .await
    }

    /// List one customer's orders as a lazy paginated stream.
    pub async fn list_customer_orders(
        &self,
        customer_id: &str,
        options: &ListOrdersOptions,
    ) -> Result<PageStream> {
        self.v3_paginate(
            &self.v3_account_path(&format!("/customers/{}/orders", customer_id)),
            options.to_params(),
            PageStyle::cursor("orders"),
            NotFoundBehavior::EmptyObject,
        )
        .await
    }
}
