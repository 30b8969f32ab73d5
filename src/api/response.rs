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


//! Response classification
//!
//! Maps a raw HTTP outcome (status code + body text) to either a decoded
//! JSON payload or a typed failure. Every resource call in both API
//! generations funnels through [`classify`].
//!
//! The 404 handling is endpoint-dependent on this service: most v3 list
//! surfaces answer 404 for "nothing found" and callers expect an empty
//! result, while point lookups on the subscription surface and the whole v1
//! generation treat 404 as a hard failure. Callers declare which behavior
//! their endpoint has via [`NotFoundBehavior`]; the split is preserved
//! per endpoint rather than unified.
//!
//! The classifier never retries and never rewrites service messages; the
//! body text lands verbatim inside the error variant. Identical inputs
//! always classify identically.

use serde_json::{Map, Value};

use crate::error::{IonError, Result};

/// How an endpoint wants HTTP 404 classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundBehavior {
    /// 404 means "nothing there": classified as success with an empty JSON
    /// object, so list invokers see an absent items field and yield nothing.
    EmptyObject,
    /// 404 is a [`IonError::NotFound`] failure.
    Error,
}

/// Classify one HTTP round-trip.
///
/// * 200 decodes the body as JSON; an undecodable body is an
///   `InvalidResponse` failure, not a success.
/// * 400 / 401 / 403 / 5xx map to their taxonomy variants.
/// * 404 follows `not_found`.
/// * Everything else is `Unclassified` with the status carried along.
pub fn classify(status: u16, body: &str, not_found: NotFoundBehavior) -> Result<Value> {
    match status {
        200 => serde_json::from_str(body).map_err(|e| IonError::InvalidResponse {
            message: format!("undecodable success body: {}", e),
            body: Some(snippet(body)),
        }),
        400 => Err(IonError::BadRequest(body.to_string())),
        401 => Err(IonError::Unauthenticated(body.to_string())),
        403 => Err(IonError::Unauthorized(body.to_string())),
        404 => match not_found {
            NotFoundBehavior::EmptyObject => Ok(Value::Object(Map::new())),
            NotFoundBehavior::Error => Err(IonError::NotFound(body.to_string())),
        },
        s if s >= 500 => Err(IonError::ServerError(body.to_string())),
        s => Err(IonError::Unclassified {
            status: s,
            message: body.to_string(),
        }),
    }
}

/// Drain a reqwest response and classify it.
pub(crate) async fn classify_response(
    response: reqwest::Response,
    not_found: NotFoundBehavior,
) -> Result<Value> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    classify(status, &body, not_found)
}

/// First 500 bytes of a body, for error context.
fn snippet(body: &str) -> String {
    let mut end = body.len().min(500);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: [NotFoundBehavior; 2] = [NotFoundBehavior::EmptyObject, NotFoundBehavior::Error];

    #[test]
    fn ok_decodes_body() {
        for behavior in BOTH {
            let value = classify(200, r#"{"items": [1, 2]}"#, behavior).unwrap();
            assert_eq!(value["items"][0], 1);
        }
    }

    #[test]
    fn ok_with_garbage_body_is_invalid_response() {
        let err = classify(200, "<html>oops</html>", NotFoundBehavior::Error).unwrap_err();
        assert!(matches!(err, IonError::InvalidResponse { .. }));
    }

    #[test]
    fn client_errors_map_to_taxonomy() {
        for behavior in BOTH {
            assert!(matches!(
                classify(400, "bad", behavior).unwrap_err(),
                IonError::BadRequest(m) if m == "bad"
            ));
            assert!(matches!(
                classify(401, "expired", behavior).unwrap_err(),
                IonError::Unauthenticated(m) if m == "expired"
            ));
            assert!(matches!(
                classify(403, "forbidden", behavior).unwrap_err(),
                IonError::Unauthorized(m) if m == "forbidden"
            ));
        }
    }

    #[test]
    fn not_found_follows_endpoint_behavior() {
        let empty = classify(404, "missing", NotFoundBehavior::EmptyObject).unwrap();
        assert_eq!(empty, Value::Object(Map::new()));

        let err = classify(404, "missing", NotFoundBehavior::Error).unwrap_err();
        assert!(matches!(err, IonError::NotFound(m) if m == "missing"));
    }

    #[test]
    fn server_errors_cover_the_5xx_range() {
        for behavior in BOTH {
            for status in [500, 503, 599] {
                assert!(matches!(
                    classify(status, "down", behavior).unwrap_err(),
                    IonError::ServerError(m) if m == "down"
                ));
            }
        }
    }

    #[test]
    fn anything_else_is_unclassified() {
        for behavior in BOTH {
            for status in [204, 302, 418, 429] {
                let err = classify(status, "odd", behavior).unwrap_err();
                assert!(
                    matches!(err, IonError::Unclassified { status: s, .. } if s == status),
                    "status {} should be unclassified",
                    status
                );
            }
        }
    }

    #[test]
    fn identical_inputs_classify_identically() {
        let a = classify(403, "no", NotFoundBehavior::Error).unwrap_err();
        let b = classify(403, "no", NotFoundBehavior::Error).unwrap_err();
        assert_eq!(a.to_string(), b.to_string());
    }
}
