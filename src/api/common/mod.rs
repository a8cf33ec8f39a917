//
//  crconnect
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Common API Types for the Connect Client
//!
//! This module provides the types shared by every endpoint: the unified
//! error taxonomy and the cursor-based pagination machinery (re-exported
//! from the [`pagination`] submodule).
//!
//! # Error Taxonomy
//!
//! | Kind | Variant | Origin |
//! |------|---------|--------|
//! | Configuration | [`Error::NoSession`], [`Error::InvalidApiKey`] | Local, pre-network |
//! | API | [`Error::Api`] | Any non-2xx HTTP response |
//! | Transport | [`Error::Network`] | DNS, timeout, connection reset, … |
//!
//! All three kinds propagate synchronously to the immediate caller; nothing
//! is retried, swallowed, or replaced with a fallback value.
//!
//! # Example
//!
//! ```rust
//! use crconnect::Error;
//!
//! fn handle<T>(result: Result<T, Error>) {
//!     match result {
//!         Ok(_) => println!("success"),
//!         Err(Error::NoSession) => println!("call create_session() first"),
//!         Err(Error::Api { status, data }) => {
//!             println!("API rejected the request with status {}", status);
//!             if let Some(data) = data {
//!                 println!("  detail: {:?}", data.detail);
//!             }
//!         }
//!         Err(e) => println!("transport failure: {}", e),
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod pagination;

pub use pagination::{Page, Paginator};

/// Unified error type for all Connect API operations.
///
/// Exactly one of a decoded success value or an `Error` is produced per
/// request, never both and never neither.
#[derive(Error, Debug)]
pub enum Error {
    /// No session was supplied and no default session has been registered.
    ///
    /// Surfaced before any network activity. Either call
    /// [`create_session`](crate::create_session) or pass a
    /// [`Session`](crate::Session) explicitly.
    #[error("no session has been supplied; either use create_session() or pass a Session explicitly")]
    NoSession,

    /// The API key cannot be carried as an HTTP header value.
    #[error("API key is not a valid header value: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),

    /// The server answered with a non-2xx status.
    ///
    /// `data` holds the parsed error envelope when the response body carried
    /// an `error` field, `None` otherwise (a lenient decode, not a failure).
    #[error("API error ({status}): {}", error_summary(.data))]
    Api {
        /// The HTTP status code of the response.
        status: u16,
        /// The parsed error envelope body, if one was present.
        data: Option<ApiErrorData>,
    },

    /// A connection-level failure from the underlying HTTP client.
    ///
    /// Passed through unmodified; never reinterpreted as an API error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Best-effort summary line for [`Error::Api`] display.
fn error_summary(data: &Option<ApiErrorData>) -> String {
    let Some(data) = data else {
        return "no error details in response body".to_string();
    };

    data.title
        .as_deref()
        .or(data.detail.as_deref())
        .unwrap_or("no error details in response body")
        .to_string()
}

/// Structured error content returned by the Connect API on non-2xx responses.
///
/// The wire shape is RFC 7807 problem details nested under an `error` key:
///
/// ```json
/// { "error": { "type": "…", "title": "…", "status": 400, "detail": "…", "instance": "…" } }
/// ```
///
/// Every field is optional; the server omits what it does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorData {
    /// URI reference identifying the problem type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Short, human-readable summary of the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The HTTP status code, duplicated inside the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,

    /// Human-readable explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying this specific occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Wire envelope wrapping [`ApiErrorData`] in error responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ApiErrorData>,
}

/// Leniently decodes a non-2xx response body into its error payload.
///
/// Returns `None` when the body is not JSON or has no `error` key; a
/// malformed error body must never mask the status code it arrived with.
pub(crate) fn decode_error_data(body: &[u8]) -> Option<ApiErrorData> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_envelope() {
        let body = br#"{"error":{"type":"about:blank","title":"Bad Request","status":400,"detail":"payment is required","instance":"/api/v1/project"}}"#;
        let data = decode_error_data(body).unwrap();
        assert_eq!(data.title.as_deref(), Some("Bad Request"));
        assert_eq!(data.status, Some(400));
        assert_eq!(data.detail.as_deref(), Some("payment is required"));
    }

    #[test]
    fn test_decode_body_without_error_key() {
        assert_eq!(decode_error_data(b"{}"), None);
    }

    #[test]
    fn test_decode_non_json_body() {
        assert_eq!(decode_error_data(b"<html>teapot</html>"), None);
    }

    #[test]
    fn test_api_error_display_prefers_title() {
        let err = Error::Api {
            status: 400,
            data: Some(ApiErrorData {
                kind: None,
                title: Some("Bad Request".to_string()),
                status: Some(400),
                detail: Some("payment is required".to_string()),
                instance: None,
            }),
        };
        assert_eq!(err.to_string(), "API error (400): Bad Request");
    }

    #[test]
    fn test_api_error_display_without_data() {
        let err = Error::Api {
            status: 502,
            data: None,
        };
        assert_eq!(
            err.to_string(),
            "API error (502): no error details in response body"
        );
    }
}
