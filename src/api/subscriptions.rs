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


//! Subscriptions resource (v3)
//!
//! # API Endpoints
//! - `GET /api/v3/accounts/{account}/subscriptions` (offset-paginated)
//! - `GET /api/v3/accounts/{account}/customers/{customer}/subscriptions/{subscription}`
//!
//! This family is the odd one out twice over: it paginates with a numeric
//! `pagination.offset` instead of a cursor token, and it answers 404 with a
//! hard `NotFound` failure where the neighboring listings return an empty
//! result. Both quirks are part of the endpoint contract and are kept
//! as observed.
//!
//! The listing accepts the platform's largest filter set. Structured
//! date-range filters flatten into dotted wire names:
//! `startDateRange.relativeDateRange=LAST_MONTH` for a named range, or
//! `startDateRange.fixedDateRange.startDate=...` / `...endDate=...` for an
//! explicit pair.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::client::IonClient;
use crate::api::pagination::{PageStream, PageStyle};
use crate::api::reports::RelativeDateRange;
use crate::api::response::NotFoundBehavior;
use crate::error::Result;

/// A relative or fixed date-range filter, flattened to `{field}.*` wire
/// parameters.
#[derive(Debug, Clone)]
pub enum DateRangeFilter {
    /// Named relative range (`{field}.relativeDateRange`)
    Relative(RelativeDateRange),
    /// Explicit ISO 8601 start/end pair
    /// (`{field}.fixedDateRange.startDate` / `.endDate`)
    Fixed { start_date: String, end_date: String },
}

impl DateRangeFilter {
    fn append_params(&self, field: &str, params: &mut Vec<(String, String)>) {
        match self {
            DateRangeFilter::Relative(range) => {
                params.push((
                    format!("{}.relativeDateRange", field),
                    range.as_str().to_string(),
                ));
            }
            DateRangeFilter::Fixed {
                start_date,
                end_date,
            } => {
                params.push((
                    format!("{}.fixedDateRange.startDate", field),
                    start_date.clone(),
                ));
                params.push((format!("{}.fixedDateRange.endDate", field), end_date.clone()));
            }
        }
    }
}

/// Recognized filter and sort options for [`IonClient::list_subscriptions`].
///
/// Each field maps to exactly one wire parameter. The server does not
/// validate filter combinations; conflicting filters pass through as-is.
#[derive(Debug, Clone)]
pub struct ListSubscriptionsOptions {
    /// Unique customer ID (`customerId`)
    pub customer_id: Option<String>,
    /// Unique subscription ID (`subscriptionId`)
    pub subscription_id: Option<String>,
    /// Unique reseller ID (`resellerId`)
    pub reseller_id: Option<i64>,
    /// Unique cloud provider ID (`providerId`)
    pub provider_id: Option<i64>,
    /// Current subscription status (`subscriptionStatus`)
    pub subscription_status: Option<String>,
    /// Relative or fixed start-date range (`startDateRange.*`)
    pub start_date_range: Option<DateRangeFilter>,
    /// Subscription end time, ISO 8601 (`endDate`)
    pub end_date: Option<String>,
    /// Relative or fixed end-date range (`endDateRange.*`)
    pub end_date_range: Option<DateRangeFilter>,
    /// Billing term (`billingTerm`)
    pub billing_term: Option<String>,
    /// Total licenses available for the account (`totalLicense`)
    pub total_license: Option<String>,
    /// Product ID in the CCP catalog (`ccpProductId`)
    pub ccp_product_id: Option<String>,
    /// Product ID in the provider catalog (`providerProductId`)
    pub provider_product_id: Option<String>,
    /// End customer's purchase order (`customerPo`)
    pub customer_po: Option<String>,
    /// Reseller's purchase order (`resellerPo`)
    pub reseller_po: Option<String>,
    /// Custom-field attribute filters, flattened to `customField.{key}`
    pub custom_fields: BTreeMap<String, String>,
    /// Cloud provider name, e.g. AWS or GCP (`cloudProviderName`)
    pub cloud_provider_name: Option<String>,
    /// Account name (`accountName`)
    pub account_name: Option<String>,
    /// Customer name (`customerName`)
    pub customer_name: Option<String>,
    /// Subscription name (`subscriptionName`)
    pub subscription_name: Option<String>,
    /// Resource type identifier (`resourceType`)
    pub resource_type: Option<String>,
    /// Results per page; also the offset step the paginator advances by
    pub page_size: u32,
    /// Additional filtering expression (`pagination.filter`)
    pub filter: Option<String>,
    /// Field to sort by (`pagination.sortBy`)
    pub sort_by: Option<String>,
    /// Sort order, asc or desc (`pagination.sortOrder`)
    pub sort_order: Option<String>,
    /// User ID for filtering (`pagination.userId`)
    pub user_id: Option<i64>,
}

impl Default for ListSubscriptionsOptions {
    fn default() -> Self {
        Self {
            customer_id: None,
            subscription_id: None,
            reseller_id: None,
            provider_id: None,
            subscription_status: None,
            start_date_range: None,
            end_date: None,
            end_date_range: None,
            billing_term: None,
            total_license: None,
            ccp_product_id: None,
            provider_product_id: None,
            customer_po: None,
            reseller_po: None,
            custom_fields: BTreeMap::new(),
            cloud_provider_name: None,
            account_name: None,
            customer_name: None,
            subscription_name: None,
            resource_type: None,
            page_size: 10,
            filter: None,
            sort_by: None,
            sort_order: None,
            user_id: None,
        }
    }
}

impl ListSubscriptionsOptions {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        let strings = [
            ("customerId", &self.customer_id),
            ("subscriptionId", &self.subscription_id),
            ("subscriptionStatus", &self.subscription_status),
            ("endDate", &self.end_date),
            ("billingTerm", &self.billing_term),
            ("totalLicense", &self.total_license),
            ("ccpProductId", &self.ccp_product_id),
            ("providerProductId", &self.provider_product_id),
            ("customerPo", &self.customer_po),
            ("resellerPo", &self.reseller_po),
            ("cloudProviderName", &self.cloud_provider_name),
            ("accountName", &self.account_name),
            ("customerName", &self.customer_name),
            ("subscriptionName", &self.subscription_name),
            ("resourceType", &self.resource_type),
            ("pagination.filter", &self.filter),
            ("pagination.sortBy", &self.sort_by),
            ("pagination.sortOrder", &self.sort_order),
        ];
        for (wire_name, value) in strings {
            if let Some(value) = value {
                params.push((wire_name.to_string(), value.clone()));
            }
        }

        if let Some(reseller_id) = self.reseller_id {
            params.push(("resellerId".to_string(), reseller_id.to_string()));
        }
        if let Some(provider_id) = self.provider_id {
            params.push(("providerId".to_string(), provider_id.to_string()));
        }
        if let Some(user_id) = self.user_id {
            params.push(("pagination.userId".to_string(), user_id.to_string()));
        }

        if let Some(ref range) = self.start_date_range {
            range.append_params("startDateRange", &mut params);
        }
        if let Some(ref range) = self.end_date_range {
            range.append_params("endDateRange", &mut params);
        }
        for (key, value) in &self.custom_fields {
            params.push((format!("customField.{}", key), value.clone()));
        }

        params
    }
}

impl IonClient {
    /// List subscriptions as a lazy offset-paginated stream.
    ///
    /// Enumeration stops at the first page that comes back with an empty
    /// item batch; `pagination.limit` / `pagination.offset` advance in
    /// steps of [`ListSubscriptionsOptions::page_size`].
    pub async fn list_subscriptions(
        &self,
        options: &ListSubscriptionsOptions,
    ) -> Result<PageStream> {
        self.v3_paginate(
            &self.v3_account_path("/subscriptions"),
            options.to_params(),
            PageStyle::offset("items", options.page_size),
            NotFoundBehavior::Error,
        )
        .await
    }

    /// Fetch one subscription of one customer.
    ///
    /// `refresh` asks the service to recompute the record before answering.
    ///
    /// # Errors
    /// Unknown customer or subscription IDs are a `NotFound` failure on
    /// this surface.
    pub async fn get_customer_subscription(
        &self,
        customer_id: &str,
        subscription_id: &str,
        refresh: Option<bool>,
    ) -> Result<Value> {
        let mut params = Vec::new();
        if let Some(refresh) = refresh {
            params.push(("refresh".to_string(), refresh.to_string()));
        }
        self.v3_get(
            &self.v3_account_path(&format!(
                "/customers/{}/subscriptions/{}",
                customer_id, subscription_id
            )),
            &params,
            NotFoundBehavior::Error,
        )
        .await
    }
}
