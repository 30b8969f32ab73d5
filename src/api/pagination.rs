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


//! Lazy cursor-following pagination
//!
//! Every list-style endpoint on the v3 surface paginates, but the service is
//! not consistent about how: most endpoints hand back an opaque
//! `nextPageToken` cursor, while the subscription family uses a numeric
//! `pagination.offset` that the client advances itself. [`PageStream`] covers
//! both, driven by the [`PageStyle`] the resource invoker declares.
//!
//! The stream is lazy: a page is fetched only once every previously yielded
//! item has been consumed, and dropping the stream issues no further
//! requests. It is not restartable; re-listing means building a new stream,
//! which starts again from page one. Items are yielded in service order with
//! no cross-page de-duplication, and there is no client-side page bound: a
//! service that keeps returning cursors keeps getting polled.
//!
//! Termination rules:
//! * cursor style stops when the response carries no next token. An empty
//!   item batch with a token present fetches exactly one more page, since
//!   only the absent token is authoritative.
//! * offset style stops as soon as a page yields an empty item batch.
//!
//! A classified failure ends the stream immediately: the error is returned
//! to the caller once and subsequent polls report exhaustion.

use std::collections::VecDeque;

use futures_util::Stream;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::debug;

use crate::api::response::{classify, NotFoundBehavior};
use crate::error::Result;

/// The pagination convention of one endpoint family.
#[derive(Debug, Clone)]
pub enum PageStyle {
    /// Opaque continuation token: sent as `token_param`, read back from
    /// `next_token_field`. Absence of the token terminates the sequence.
    Cursor {
        items_field: &'static str,
        token_param: &'static str,
        next_token_field: &'static str,
    },
    /// Numeric offset advanced by the client in steps of `page_size`.
    /// An empty item batch terminates the sequence.
    Offset {
        items_field: &'static str,
        limit_param: &'static str,
        offset_param: &'static str,
        page_size: u32,
    },
}

impl PageStyle {
    /// Cursor style with the service's standard `pageToken` /
    /// `nextPageToken` parameter names.
    pub fn cursor(items_field: &'static str) -> Self {
        PageStyle::Cursor {
            items_field,
            token_param: "pageToken",
            next_token_field: "nextPageToken",
        }
    }

    /// Offset style with the service's standard `pagination.limit` /
    /// `pagination.offset` parameter names.
    pub fn offset(items_field: &'static str, page_size: u32) -> Self {
        PageStyle::Offset {
            items_field,
            limit_param: "pagination.limit",
            offset_param: "pagination.offset",
            page_size,
        }
    }

    fn items_field(&self) -> &'static str {
        match self {
            PageStyle::Cursor { items_field, .. } => items_field,
            PageStyle::Offset { items_field, .. } => items_field,
        }
    }
}

/// Request template the stream replays for every page, with only the
/// continuation parameter varying between requests.
#[derive(Debug, Clone)]
pub(crate) struct PageRequest {
    pub client: reqwest::Client,
    pub url: String,
    pub headers: HeaderMap,
    pub params: Vec<(String, String)>,
    pub not_found: NotFoundBehavior,
}

/// Where the next fetch continues from.
#[derive(Debug)]
enum Continuation {
    FirstPage,
    Token(String),
    Offset(u64),
    Exhausted,
}

/// Lazy, non-restartable sequence of records spanning service pages.
///
/// Obtained from the list operations on [`crate::IonClient`]. Drive it with
/// [`try_next`](Self::try_next) or drain it with
/// [`try_collect`](Self::try_collect); [`into_stream`](Self::into_stream)
/// adapts it to a `futures_util::Stream` for combinator-style consumption.
#[derive(Debug)]
pub struct PageStream {
    request: PageRequest,
    style: PageStyle,
    buffered: VecDeque<Value>,
    continuation: Continuation,
    pages_fetched: u32,
    item_map: Option<fn(Value) -> Value>,
}

impl PageStream {
    pub(crate) fn new(request: PageRequest, style: PageStyle) -> Self {
        Self {
            request,
            style,
            buffered: VecDeque::new(),
            continuation: Continuation::FirstPage,
            pages_fetched: 0,
            item_map: None,
        }
    }

    /// Post-process every yielded record (short-ID derivation).
    pub(crate) fn with_item_map(mut self, map: fn(Value) -> Value) -> Self {
        self.item_map = Some(map);
        self
    }

    /// Yield the next record, fetching the next page only when the current
    /// one is drained.
    ///
    /// `Ok(None)` signals the end of the sequence. A classified failure is
    /// returned once; afterwards the stream reports exhaustion.
    pub async fn try_next(&mut self) -> Result<Option<Value>> {
        loop {
            if let Some(record) = self.buffered.pop_front() {
                return Ok(Some(match self.item_map {
                    Some(map) => map(record),
                    None => record,
                }));
            }
            if matches!(self.continuation, Continuation::Exhausted) {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    /// Drain the remaining sequence into a Vec.
    pub async fn try_collect(mut self) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        while let Some(record) = self.try_next().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Adapt into a `futures_util::Stream` of `Result<Value>`.
    ///
    /// A failure is yielded as the final element; the stream then ends.
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> {
        futures_util::stream::unfold(self, |mut pages| async move {
            match pages.try_next().await {
                Ok(Some(record)) => Some((Ok(record), pages)),
                Ok(None) => None,
                Err(e) => Some((Err(e), pages)),
            }
        })
    }

    /// Number of HTTP requests issued so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let mut params = self.request.params.clone();
        let mut current_offset = 0u64;
        match (&self.style, &self.continuation) {
            (PageStyle::Cursor { .. }, Continuation::FirstPage) => {}
            (PageStyle::Cursor { token_param, .. }, Continuation::Token(token)) => {
                params.push((token_param.to_string(), token.clone()));
            }
            (
                PageStyle::Offset {
                    limit_param,
                    offset_param,
                    page_size,
                    ..
                },
                continuation,
            ) => {
                if let Continuation::Offset(offset) = continuation {
                    current_offset = *offset;
                }
                params.push((limit_param.to_string(), page_size.to_string()));
                params.push((offset_param.to_string(), current_offset.to_string()));
            }
            // Unreachable: try_next guards exhaustion and cursor streams
            // never hold an offset continuation.
            _ => return Ok(()),
        }

        let outcome = async {
            let response = self
                .request
                .client
                .get(&self.request.url)
                .headers(self.request.headers.clone())
                .query(&params)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            classify(status, &body, self.request.not_found)
        }
        .await;

        let page = match outcome {
            Ok(page) => page,
            Err(e) => {
                self.continuation = Continuation::Exhausted;
                return Err(e);
            }
        };
        self.pages_fetched += 1;

        let batch = page
            .get(self.style.items_field())
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let batch_len = batch.len();
        self.buffered.extend(batch);

        self.continuation = match &self.style {
            PageStyle::Cursor {
                next_token_field, ..
            } => match page
                .get(*next_token_field)
                .and_then(Value::as_str)
                .filter(|token| !token.is_empty())
            {
                Some(token) => Continuation::Token(token.to_string()),
                None => Continuation::Exhausted,
            },
            PageStyle::Offset { page_size, .. } => {
                if batch_len == 0 {
                    Continuation::Exhausted
                } else {
                    Continuation::Offset(current_offset + u64::from(*page_size))
                }
            }
        };

        debug!(
            url = %self.request.url,
            page = self.pages_fetched,
            items = batch_len,
            "fetched page"
        );
        Ok(())
    }
}
