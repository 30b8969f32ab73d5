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


//! Products resource (v3)
//!
//! # API Endpoints
//! - `GET /api/v3/accounts/{account}/products` (cursor-paginated)
//! - `GET /api/v3/accounts/{account}/products/{product}`
//!
//! The point lookup defaults to excluding every heavyweight payload section
//! (pricing, marketing, definition, version history, deployment); callers
//! opt back in per section. 404 classifies as an empty result, and both
//! operations attach the short `id` derived from the record's `name` path.

use serde_json::Value;

use crate::api::attach_short_id;
use crate::api::client::IonClient;
use crate::api::pagination::{PageStream, PageStyle};
use crate::api::response::NotFoundBehavior;
use crate::error::Result;

/// Recognized filters for [`IonClient::list_products`].
#[derive(Debug, Clone, Default)]
pub struct ListProductsOptions {
    /// Requested page size; the server may return fewer results and picks
    /// a default when unset
    pub page_size: Option<u32>,
    /// Language for the product data (`language`)
    pub language: Option<String>,
    /// Marketing display name filter (`filter.name`)
    pub name: Option<String>,
    /// External ID assigned to SKUs (`filter.skuExternalId`)
    pub sku_external_id: Option<String>,
    /// External ID assigned to addons (`filter.addonExternalId`)
    pub addon_external_id: Option<String>,
    /// SKU ID (`filter.skuId`)
    pub sku_id: Option<String>,
    /// Addon ID (`filter.addonId`)
    pub addon_id: Option<String>,
    /// SKU display name (`filter.skuDisplayName`)
    pub sku_display_name: Option<String>,
    /// Addon display name (`filter.addonDisplayName`)
    pub addon_display_name: Option<String>,
}

impl ListProductsOptions {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(page_size) = self.page_size {
            params.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(ref language) = self.language {
            params.push(("language".to_string(), language.clone()));
        }
        let filters = [
            ("filter.name", &self.name),
            ("filter.skuExternalId", &self.sku_external_id),
            ("filter.addonExternalId", &self.addon_external_id),
            ("filter.skuId", &self.sku_id),
            ("filter.addonId", &self.addon_id),
            ("filter.skuDisplayName", &self.sku_display_name),
            ("filter.addonDisplayName", &self.addon_display_name),
        ];
        for (wire_name, value) in filters {
            if let Some(value) = value {
                params.push((wire_name.to_string(), value.clone()));
            }
        }
        params
    }
}

/// Options for [`IonClient::get_product`].
///
/// The five `exclude_*` flags are always sent on the wire
/// (`excludeFilter.excludePricing` and friends) and default to `true`.
#[derive(Debug, Clone)]
pub struct GetProductOptions {
    /// Language for the product data (`language`)
    pub language: Option<String>,
    /// Customer ID for pricebook filtering (`priceBookCustomerId`)
    pub pricebook_customer_id: Option<i64>,
    /// Product version (`productVersion`)
    pub product_version: Option<String>,
    pub exclude_pricing: bool,
    pub exclude_marketing: bool,
    pub exclude_definition: bool,
    pub exclude_version_history: bool,
    pub exclude_deployment: bool,
    /// Requesting role (`clientRole`)
    pub client_role: String,
}

impl Default for GetProductOptions {
    fn default() -> Self {
        Self {
            language: None,
            pricebook_customer_id: None,
            product_version: None,
            exclude_pricing: true,
            exclude_marketing: true,
            exclude_definition: true,
            exclude_version_history: true,
            exclude_deployment: true,
            client_role: "CUSTOMER".to_string(),
        }
    }
}

impl GetProductOptions {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ref language) = self.language {
            params.push(("language".to_string(), language.clone()));
        }
        if let Some(customer_id) = self.pricebook_customer_id {
            params.push(("priceBookCustomerId".to_string(), customer_id.to_string()));
        }
        if let Some(ref version) = self.product_version {
            params.push(("productVersion".to_string(), version.clone()));
        }
        let excludes = [
            ("excludeFilter.excludePricing", self.exclude_pricing),
            ("excludeFilter.excludeMarketing", self.exclude_marketing),
            ("excludeFilter.excludeDefinition", self.exclude_definition),
            (
                "excludeFilter.excludeVersionHistory",
                self.exclude_version_history,
            ),
            ("excludeFilter.excludeDeployment", self.exclude_deployment),
        ];
        for (wire_name, flag) in excludes {
            params.push((wire_name.to_string(), flag.to_string()));
        }
        params.push(("clientRole".to_string(), self.client_role.clone()));
        params
    }
}

impl IonClient {
    /// List the product catalog as a lazy paginated stream.
    pub async fn list_products(&self, options: &ListProductsOptions) -> Result<PageStream> {
        let stream = self
            .v3_paginate(
                &self.v3_account_path("/products"),
                options.to_params(),
                PageStyle::cursor("products"),
                NotFoundBehavior::EmptyObject,
            )
            .await?;
        Ok(stream.with_item_map(attach_short_id))
    }

    /// Fetch a single product by its short ID.
    pub async fn get_product(
        &self,
        product_id: &str,
        options: &GetProductOptions,
    ) -> Result<Value> {
        let record = self
            .v3_get(
                &self.v3_account_path(&format!("/products/{}", product_id)),
                &options.to_params(),
                NotFoundBehavior::EmptyObject,
            )
            .await?;
        Ok(attach_short_id(record))
    }
}
