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


//! Legacy key/secret (v1) API surface
//!
//! The v1 generation authenticates every request with a static Basic
//! header, has no token lifecycle, and paginates with plain `limit` /
//! `offset` query parameters consumed in a single shot rather than through
//! the lazy page walker. Its query syntax predates the dotted v3 style:
//! filters are bracketed (`filter[field:modifier]=value`), sorts are
//! `sort[field]=direction`, relations are a comma-joined list. 404 is
//! always a `NotFound` failure on this generation.

pub mod billing;
pub mod customers;

pub use billing::{GenerateInvoicesOptions, ListInvoicesOptions};
pub use customers::ListCustomersV1Options;

use std::collections::BTreeMap;

/// One bracketed v1 filter value, optionally carrying a comparison
/// modifier (`eq`, `lt`, `gt`, ...).
#[derive(Debug, Clone)]
pub struct FilterValue {
    pub value: String,
    pub modifier: Option<String>,
}

impl FilterValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            modifier: None,
        }
    }

    pub fn with_modifier(value: impl Into<String>, modifier: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            modifier: Some(modifier.into()),
        }
    }
}

/// Field-keyed filter set for the v1 surface. Field names pass through to
/// the wire unvalidated.
pub type V1Filters = BTreeMap<String, FilterValue>;

/// Render filters as `filter[field]=value` / `filter[field:modifier]=value`
/// query fragments, with the value percent-encoded.
pub(crate) fn filter_params(filters: &V1Filters) -> Vec<String> {
    filters
        .iter()
        .map(|(field, filter)| match &filter.modifier {
            Some(modifier) => format!(
                "filter[{}:{}]={}",
                field,
                modifier,
                urlencoding::encode(&filter.value)
            ),
            None => format!("filter[{}]={}", field, urlencoding::encode(&filter.value)),
        })
        .collect()
}

/// Render sorts as `sort[field]=direction` query fragments.
pub(crate) fn sort_params(sort: &BTreeMap<String, String>) -> Vec<String> {
    sort.iter()
        .map(|(field, direction)| format!("sort[{}]={}", field, urlencoding::encode(direction)))
        .collect()
}

/// Render the comma-joined `relations=` fragment, if any were requested.
pub(crate) fn relations_param(relations: &[String]) -> Option<String> {
    if relations.is_empty() {
        None
    } else {
        Some(format!("relations={}", relations.join(",")))
    }
}
