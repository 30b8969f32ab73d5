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


//! Billing resource (v1)
//!
//! Invoice retrieval, invoice generation, and detailed invoice file
//! downloads.
//!
//! # API Endpoints
//! - `GET /api/v1/invoices/myinvoices`
//! - `GET /api/v1/invoices?customerId={customer}`
//! - `GET /api/v1/invoices/{invoice}/detailed`
//! - `POST /api/v1/invoices/generate`
//!
//! The detailed-invoice endpoint answers with pre-signed file URLs that are
//! fetched without auth and written verbatim into the caller's folder.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use serde_json::Value;
use tracing::warn;

use crate::api::client::IonClient;
use crate::error::{IonError, Result};
use crate::v1::{filter_params, relations_param, sort_params, V1Filters};

/// Options for the invoice listings.
#[derive(Debug, Clone)]
pub struct ListInvoicesOptions {
    /// Bracketed field filters (`filter[field:modifier]=value`)
    pub filters: V1Filters,
    /// Sort directions per field (`sort[field]=asc|desc`)
    pub sort: std::collections::BTreeMap<String, String>,
    /// Maximum number of invoices to retrieve
    pub limit: u32,
    /// Number of invoices to skip
    pub offset: u32,
    /// Related entities to include in the response
    pub relations: Vec<String>,
}

impl Default for ListInvoicesOptions {
    fn default() -> Self {
        Self {
            filters: V1Filters::new(),
            sort: std::collections::BTreeMap::new(),
            limit: 100,
            offset: 0,
            relations: Vec::new(),
        }
    }
}

impl ListInvoicesOptions {
    fn to_query(&self) -> String {
        let mut params = vec![
            format!("limit={}", self.limit),
            format!("offset={}", self.offset),
        ];
        params.extend(filter_params(&self.filters));
        params.extend(sort_params(&self.sort));
        params.extend(relations_param(&self.relations));
        params.join("&")
    }
}

/// Options for [`IonClient::generate_invoices`].
#[derive(Debug, Clone)]
pub struct GenerateInvoicesOptions {
    /// Source for invoice generation
    pub source: String,
    /// Billing period, e.g. `m-07-2025`; defaults to the previous calendar
    /// month when unset
    pub period: Option<String>,
    /// Status of the invoices to generate
    pub status: String,
    /// Restrict generation to these customer IDs
    pub customers: Vec<String>,
    /// Restrict generation to these reseller IDs
    pub resellers: Vec<String>,
    /// Whether to send emails after generation
    pub send_emails: bool,
}

impl GenerateInvoicesOptions {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            period: None,
            status: "open".to_string(),
            customers: Vec::new(),
            resellers: Vec::new(),
            send_emails: false,
        }
    }
}

/// Previous calendar month rendered as `m-{MM-YYYY}`.
fn default_billing_period() -> String {
    let today = Utc::now().date_naive();
    let last_month = today
        .with_day(1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(today);
    format!("m-{}", last_month.format("%m-%Y"))
}

impl IonClient {
    /// Retrieve the authenticated account's own invoices.
    ///
    /// # Errors
    /// `Configuration` when v1 credentials are missing (no network call is
    /// made); otherwise the classified service failure.
    pub async fn get_my_invoices(&self, options: &ListInvoicesOptions) -> Result<Value> {
        self.v1_get(&format!("/invoices/myinvoices?{}", options.to_query()))
            .await
    }

    /// Retrieve the invoices of one customer.
    pub async fn get_customer_invoices(
        &self,
        customer_id: &str,
        options: &ListInvoicesOptions,
    ) -> Result<Value> {
        self.v1_get(&format!(
            "/invoices?{}&customerId={}",
            options.to_query(),
            urlencoding::encode(customer_id)
        ))
        .await
    }

    /// Kick off invoice generation for a source and period.
    pub async fn generate_invoices(&self, options: &GenerateInvoicesOptions) -> Result<Value> {
        let period = options
            .period
            .clone()
            .unwrap_or_else(default_billing_period);

        let mut form = vec![
            ("source".to_string(), options.source.clone()),
            ("period".to_string(), period),
            ("status".to_string(), options.status.clone()),
            ("sendEmails".to_string(), options.send_emails.to_string()),
        ];
        if !options.customers.is_empty() {
            form.push(("customers".to_string(), options.customers.join(",")));
        }
        if !options.resellers.is_empty() {
            form.push(("resellers".to_string(), options.resellers.join(",")));
        }

        self.v1_post_form("/invoices/generate", &form).await
    }

    /// Download the detailed invoice files for one invoice into
    /// `save_folder`, returning the paths written.
    ///
    /// Each pre-signed URL from the service is fetched without auth; a URL
    /// that fails to download is logged and skipped rather than aborting
    /// the remaining files.
    pub async fn download_detailed_invoice_files(
        &self,
        invoice_id: &str,
        save_folder: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>> {
        let data = self
            .v1_get(&format!("/invoices/{}/detailed", invoice_id))
            .await?;

        let urls = data
            .pointer("/data/invoice/detailedInvoiceFilesUrls")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                IonError::invalid_response(
                    "detailed invoice response has no detailedInvoiceFilesUrls list",
                )
            })?;

        let mut written = Vec::new();
        for url in urls.iter().filter_map(Value::as_str) {
            match self.fetch_bytes(url).await? {
                Some(bytes) => {
                    let file_name = invoice_file_name(url);
                    let target = save_folder.as_ref().join(file_name);
                    tokio::fs::write(&target, &bytes).await?;
                    written.push(target);
                }
                None => warn!(url, "failed to download detailed invoice file"),
            }
        }
        Ok(written)
    }
}

/// File name component of a pre-signed URL, with the signature query
/// stripped.
fn invoice_file_name(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    without_query
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("invoice-file")
        .to_string()
}
