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


//! Customers resource (v1)
//!
//! # API Endpoints
//! - `GET /api/v1/customers`
//! - `GET /api/v1/customers/{customer}`
//!
//! Superseded by the v3 customers surface; kept for accounts that only
//! hold v1 credentials.

use serde_json::Value;

use crate::api::client::IonClient;
use crate::error::Result;
use crate::v1::{filter_params, relations_param, V1Filters};

/// Options for [`IonClient::get_customers_v1`].
#[derive(Debug, Clone)]
pub struct ListCustomersV1Options {
    /// Bracketed field filters (`filter[field:modifier]=value`)
    pub filters: V1Filters,
    /// Related entities to include in the response
    pub relations: Vec<String>,
    /// Maximum number of customers to retrieve
    pub limit: u32,
    /// Number of customers to skip
    pub offset: u32,
}

impl Default for ListCustomersV1Options {
    fn default() -> Self {
        Self {
            filters: V1Filters::new(),
            relations: Vec::new(),
            limit: 100,
            offset: 0,
        }
    }
}

impl ListCustomersV1Options {
    fn to_query(&self) -> String {
        let mut params = vec![
            format!("limit={}", self.limit),
            format!("offset={}", self.offset),
        ];
        params.extend(filter_params(&self.filters));
        params.extend(relations_param(&self.relations));
        params.join("&")
    }
}

impl IonClient {
    /// Retrieve customers, or one customer when `customer_id` is given.
    ///
    /// # Errors
    /// `Configuration` when v1 credentials are missing (no network call is
    /// made); unknown IDs are a `NotFound` failure on this generation.
    #[deprecated(since = "0.1.0", note = "superseded by the v3 customers surface")]
    pub async fn get_customers_v1(
        &self,
        customer_id: Option<&str>,
        options: &ListCustomersV1Options,
    ) -> Result<Value> {
        let path = match customer_id {
            Some(id) => format!("/customers/{}", id),
            None => "/customers".to_string(),
        };
        self.v1_get(&format!("{}?{}", path, options.to_query())).await
    }
}
