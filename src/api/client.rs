//
//  crconnect
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # HTTP Request Plumbing for the Connect API
//!
//! This module is the core of the crate: it turns a (method, path, query,
//! body) tuple into one authenticated HTTP request and classifies the outcome
//! as either a decoded success value or an [`Error`].
//!
//! ## Components
//!
//! | Piece | Entry point | Responsibility |
//! |-------|-------------|----------------|
//! | Query encoder | [`to_query_str`] | Flatten nested maps into `a[b][c]=v` pairs |
//! | URL builder | [`endpoint_url`] | Compose `{base}/api/{version}{path}?{query}` |
//! | Request executor | [`request`] | Session resolution, headers, error mapping |
//! | Verb facade | [`get`], [`post`], [`put`], [`patch`], [`delete`] | Typed one-liners over the executor |
//!
//! ## Error Mapping
//!
//! A 2xx response is a success and is decoded per the caller's preference
//! (typed JSON, raw bytes via [`get_bytes`], or the untouched transport
//! response from [`request`] itself). Any non-2xx response becomes
//! [`Error::Api`] carrying the status code and a best-effort parse of the
//! error envelope. Transport failures (DNS, timeout, reset) surface as
//! [`Error::Network`] without reinterpretation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use crconnect::api::client::{self, CallOptions};
//! use serde_json::Value;
//!
//! crconnect::create_session("your-api-key", true)?;
//!
//! let account: Value = client::get("/account", None, None, &CallOptions::default())?;
//! println!("{account}");
//! # Ok::<(), crconnect::Error>(())
//! ```

use std::time::Duration;

use reqwest::blocking::Response;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::common::{self, Error};
use super::session::{self, Session};

/// Production host of the Connect API.
pub const BASE_URL: &str = "https://connect-api.cloudresearch.com";

/// API version segment used when a call does not specify one.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Per-call header letting the server deduplicate retried mutating requests.
pub(crate) const IDEMPOTENCY_HEADER: &str = "IDEMPOTENCY-TOKEN";

/// A URL query in one of the two accepted forms.
///
/// Either a pre-formed query string, appended to the URL verbatim, or a
/// mapping that is flattened with [`to_query_str`]. Mappings may nest:
/// `{"team": {"employee": "Scott"}}` renders as `team[employee]=Scott`.
///
/// Keys and values are not percent-encoded in either form; inputs must
/// already be URL-safe. Map iteration follows insertion order, which
/// determines the left-to-right order of the emitted pairs.
#[derive(Debug, Clone)]
pub enum Query {
    /// A pre-formed query string such as `"Status=Live&Size=50"`.
    Raw(String),
    /// Key/value pairs, possibly nested, flattened with bracket notation.
    Map(Map<String, Value>),
}

impl Query {
    /// Normalizes either form into a mapping.
    ///
    /// Raw strings are split naively on `&` then `=`; values are not
    /// URL-decoded, so a raw query containing percent-encoded characters
    /// will not round-trip (a known limitation, inherited by the paginator
    /// when it merges the cursor key into a raw starting query).
    pub(crate) fn into_map(self) -> Map<String, Value> {
        match self {
            Query::Map(map) => map,
            Query::Raw(raw) => parse_query_str(&raw),
        }
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Query::Raw(raw)
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Query::Raw(raw.to_string())
    }
}

impl From<Map<String, Value>> for Query {
    fn from(map: Map<String, Value>) -> Self {
        Query::Map(map)
    }
}

/// Converts a map of values into a query string.
///
/// Nested maps are flattened by enclosing nested key names in square
/// brackets; fragments are joined with `&` in insertion order. An empty map
/// encodes to the empty string, and a nested empty map contributes no
/// fragments at all (its key disappears from the output).
///
/// Values are stringified plainly: strings are emitted without quotes,
/// everything else through its JSON representation. No percent-encoding is
/// performed; keys and values must already be URL-safe.
///
/// # Example
///
/// ```rust
/// use crconnect::api::client::to_query_str;
/// use serde_json::{json, Map};
///
/// let mut query = Map::new();
/// query.insert("team".to_string(), json!({ "employee": { "name": "Scott" } }));
/// assert_eq!(to_query_str(&query), "team[employee][name]=Scott");
/// ```
pub fn to_query_str(map: &Map<String, Value>) -> String {
    let mut fragments = Vec::new();
    collect_query_fragments(map, None, &mut fragments);
    fragments.join("&")
}

fn collect_query_fragments(map: &Map<String, Value>, prefix: Option<&str>, out: &mut Vec<String>) {
    for (key, value) in map {
        let name = match prefix {
            Some(prefix) => format!("{prefix}[{key}]"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => collect_query_fragments(nested, Some(name.as_str()), out),
            scalar => out.push(format!("{name}={}", scalar_to_str(scalar))),
        }
    }
}

/// Plain string form of a non-object query value.
fn scalar_to_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Naive inverse of [`to_query_str`] for pre-formed query strings.
///
/// Splits on `&` then `=`, keeping at most one value segment per key and a
/// null for valueless keys. Does not URL-decode.
pub(crate) fn parse_query_str(raw: &str) -> Map<String, Value> {
    let mut map = Map::new();
    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        let mut halves = pair.splitn(3, '=');
        let key = halves.next().unwrap_or_default().to_string();
        let value = halves
            .next()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null);
        map.insert(key, value);
    }
    map
}

/// Builds an endpoint URL from an endpoint path.
///
/// Produces `{base}/api/{version}{path}`, appending `?{query}` when a query
/// is present (verbatim for [`Query::Raw`], encoded with [`to_query_str`]
/// for [`Query::Map`]). `path` characters are not validated or escaped;
/// that is the caller's responsibility.
///
/// # Example
///
/// ```rust
/// use crconnect::api::client::{endpoint_url, BASE_URL, DEFAULT_API_VERSION};
///
/// let url = endpoint_url(BASE_URL, "/project", DEFAULT_API_VERSION, None);
/// assert_eq!(url, "https://connect-api.cloudresearch.com/api/v1/project");
/// ```
pub fn endpoint_url(base: &str, path: &str, version: &str, query: Option<&Query>) -> String {
    match query {
        None => format!("{base}/api/{version}{path}"),
        Some(Query::Raw(raw)) => format!("{base}/api/{version}{path}?{raw}"),
        Some(Query::Map(map)) => format!("{base}/api/{version}{path}?{}", to_query_str(map)),
    }
}

/// Per-call options forwarded to the request executor.
///
/// All fields are optional; [`CallOptions::default`] sends nothing extra.
///
/// # Fields
///
/// * `idempotency_token` - Attached as the `IDEMPOTENCY-TOKEN` header, only
///   when present, letting the server deduplicate retried mutating requests.
/// * `timeout` - Overrides the transport's default timeout for this call.
/// * `headers` - Extra headers forwarded to the transport verbatim.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// A string identifying this particular request to prevent duplicates.
    pub idempotency_token: Option<String>,
    /// Per-call timeout override.
    pub timeout: Option<Duration>,
    /// Additional headers passed through unmodified.
    pub headers: HeaderMap,
}

impl CallOptions {
    /// Options carrying only an idempotency token.
    ///
    /// ```rust
    /// use crconnect::api::client::CallOptions;
    ///
    /// let opts = CallOptions::idempotency_token("create-project-2026-02-09");
    /// assert!(opts.timeout.is_none());
    /// ```
    pub fn idempotency_token(token: impl Into<String>) -> Self {
        Self {
            idempotency_token: Some(token.into()),
            ..Self::default()
        }
    }
}

/// Performs one API request and returns the raw transport response.
///
/// This is the single funnel every call in the crate goes through. Steps:
///
/// 1. Resolve the session (explicit argument, else the registered default;
///    fails with [`Error::NoSession`] before any network activity).
/// 2. Build the URL with [`endpoint_url`] against the session's base host.
/// 3. Attach the `IDEMPOTENCY-TOKEN` header only if a token was supplied,
///    plus any passthrough options from `opts`.
/// 4. Send, blocking until the transport completes.
/// 5. 2xx: return the response untouched. Anything else: read the body,
///    leniently decode the error envelope, and fail with [`Error::Api`].
///
/// # Errors
///
/// * [`Error::NoSession`] - no session resolvable; nothing was sent.
/// * [`Error::Api`] - the server answered with a non-2xx status.
/// * [`Error::Network`] - the transport itself failed; passed through as-is.
pub fn request<B: Serialize + ?Sized>(
    method: Method,
    path: &str,
    query: Option<Query>,
    body: Option<&B>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<Response, Error> {
    let session = session::resolve(session)?;
    let url = endpoint_url(session.base_url(), path, DEFAULT_API_VERSION, query.as_ref());
    tracing::debug!(%method, %url, "sending Connect API request");

    let mut builder = session.http().request(method, &url);
    if let Some(token) = &opts.idempotency_token {
        builder = builder.header(IDEMPOTENCY_HEADER, token);
    }
    if let Some(timeout) = opts.timeout {
        builder = builder.timeout(timeout);
    }
    if !opts.headers.is_empty() {
        builder = builder.headers(opts.headers.clone());
    }
    if let Some(body) = body {
        builder = builder.json(body);
    }

    let response = builder.send()?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    tracing::debug!(status = status.as_u16(), %url, "Connect API request rejected");
    let body = response.bytes().map(|b| b.to_vec()).unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        data: common::decode_error_data(&body),
    })
}

/// Empty body marker for verb wrappers that never send one.
type NoBody = ();

/// Performs a GET request and decodes the response as JSON.
pub fn get<T: DeserializeOwned>(
    path: &str,
    query: Option<Query>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<T, Error> {
    let response = request::<NoBody>(Method::GET, path, query, None, session, opts)?;
    Ok(response.json()?)
}

/// Performs a GET request and returns the raw byte payload.
pub fn get_bytes(
    path: &str,
    query: Option<Query>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<Vec<u8>, Error> {
    let response = request::<NoBody>(Method::GET, path, query, None, session, opts)?;
    Ok(response.bytes()?.to_vec())
}

/// Performs a POST request and decodes the response as JSON.
pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
    path: &str,
    query: Option<Query>,
    body: Option<&B>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<T, Error> {
    let response = request(Method::POST, path, query, body, session, opts)?;
    Ok(response.json()?)
}

/// Performs a POST request and discards the response body.
///
/// For endpoints whose success answer is empty or not worth decoding
/// (status transitions, approvals, bonus payments).
pub fn post_unit<B: Serialize + ?Sized>(
    path: &str,
    query: Option<Query>,
    body: Option<&B>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<(), Error> {
    request(Method::POST, path, query, body, session, opts)?;
    Ok(())
}

/// Performs a PUT request and decodes the response as JSON.
pub fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
    path: &str,
    query: Option<Query>,
    body: Option<&B>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<T, Error> {
    let response = request(Method::PUT, path, query, body, session, opts)?;
    Ok(response.json()?)
}

/// Performs a PATCH request and decodes the response as JSON.
pub fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
    path: &str,
    query: Option<Query>,
    body: Option<&B>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<T, Error> {
    let response = request(Method::PATCH, path, query, body, session, opts)?;
    Ok(response.json()?)
}

/// Performs a DELETE request and decodes the response as JSON.
pub fn delete<T: DeserializeOwned, B: Serialize + ?Sized>(
    path: &str,
    query: Option<Query>,
    body: Option<&B>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<T, Error> {
    let response = request(Method::DELETE, path, query, body, session, opts)?;
    Ok(response.json()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::Error;
    use crate::api::session::{self, REGISTRY_LOCK};
    use serde_json::json;
    use std::sync::PoisonError;

    fn map(entries: &[(&str, Value)]) -> Map<String, Value> {
        let mut map = Map::new();
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        map
    }

    fn test_session(server: &mockito::Server) -> crate::Session {
        crate::create_session("test-key", false)
            .unwrap()
            .with_base_url(server.url())
    }

    #[test]
    fn test_flat_map_encodes_in_insertion_order() {
        let query = map(&[("b", json!("2")), ("a", json!("1"))]);
        assert_eq!(to_query_str(&query), "b=2&a=1");
    }

    #[test]
    fn test_single_level_nesting_uses_brackets() {
        let query = map(&[("a", json!({ "b": "v" }))]);
        assert_eq!(to_query_str(&query), "a[b]=v");
    }

    #[test]
    fn test_deep_nesting_uses_stacked_brackets() {
        let query = map(&[("team", json!({ "employee": { "name": "Scott" } }))]);
        assert_eq!(to_query_str(&query), "team[employee][name]=Scott");
    }

    #[test]
    fn test_empty_map_encodes_to_empty_string() {
        assert_eq!(to_query_str(&Map::new()), "");
    }

    #[test]
    fn test_nested_empty_map_drops_its_key() {
        let query = map(&[("a", json!({})), ("b", json!(1))]);
        assert_eq!(to_query_str(&query), "b=1");
    }

    #[test]
    fn test_scalars_are_stringified_plainly() {
        let query = map(&[("n", json!(3)), ("flag", json!(true)), ("s", json!("x"))]);
        assert_eq!(to_query_str(&query), "n=3&flag=true&s=x");
    }

    #[test]
    fn test_parse_query_str_round_trips_simple_pairs() {
        let parsed = parse_query_str("Status=Live&Size=10");
        assert_eq!(parsed["Status"], json!("Live"));
        assert_eq!(parsed["Size"], json!("10"));
        assert_eq!(to_query_str(&parsed), "Status=Live&Size=10");
    }

    #[test]
    fn test_parse_query_str_keeps_one_value_segment() {
        // Mirrors the naive split: anything past the second '=' is dropped.
        let parsed = parse_query_str("a=b=c");
        assert_eq!(parsed["a"], json!("b"));
    }

    #[test]
    fn test_parse_query_str_valueless_key_is_null() {
        let parsed = parse_query_str("flag");
        assert_eq!(parsed["flag"], Value::Null);
    }

    #[test]
    fn test_endpoint_url_without_query() {
        assert_eq!(
            endpoint_url(BASE_URL, "/project", "v1", None),
            format!("{BASE_URL}/api/v1/project")
        );
    }

    #[test]
    fn test_endpoint_url_with_raw_query() {
        let query = Query::from("x=1");
        assert_eq!(
            endpoint_url(BASE_URL, "/project", "v1", Some(&query)),
            format!("{BASE_URL}/api/v1/project?x=1")
        );
    }

    #[test]
    fn test_endpoint_url_with_map_query() {
        let query = Query::Map(map(&[("Status", json!("Live"))]));
        assert_eq!(
            endpoint_url(BASE_URL, "/project", "v2", Some(&query)),
            format!("{BASE_URL}/api/v2/project?Status=Live")
        );
    }

    #[test]
    fn test_call_without_session_fails_before_transport() {
        let _guard = REGISTRY_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        session::clear_default_session();

        let mut server = mockito::Server::new();
        let spy = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create();

        let result: Result<Value, Error> = get("/account", None, None, &CallOptions::default());
        assert!(matches!(result, Err(Error::NoSession)));
        spy.assert();
    }

    #[test]
    fn test_error_envelope_is_surfaced() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/v1/project/p1")
            .with_status(400)
            .with_body(r#"{"error":{"title":"bad"}}"#)
            .create();

        let session = test_session(&server);
        let result: Result<Value, Error> =
            get("/project/p1", None, Some(&session), &CallOptions::default());

        match result {
            Err(Error::Api { status, data }) => {
                assert_eq!(status, 400);
                assert_eq!(data.unwrap().title.as_deref(), Some("bad"));
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }

    #[test]
    fn test_error_body_without_error_key_yields_no_data() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/v1/project/p1")
            .with_status(400)
            .with_body("{}")
            .create();

        let session = test_session(&server);
        let result: Result<Value, Error> =
            get("/project/p1", None, Some(&session), &CallOptions::default());

        match result {
            Err(Error::Api { status, data }) => {
                assert_eq!(status, 400);
                assert!(data.is_none());
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }

    #[test]
    fn test_idempotency_token_is_sent_only_when_supplied() {
        let mut server = mockito::Server::new();
        let with_token = server
            .mock("POST", "/api/v1/project/p1/update-status")
            .match_header("IDEMPOTENCY-TOKEN", "tok-1")
            .with_status(200)
            .expect(1)
            .create();
        let without_token = server
            .mock("POST", "/api/v1/project/p2/update-status")
            .match_header("IDEMPOTENCY-TOKEN", mockito::Matcher::Missing)
            .with_status(200)
            .expect(1)
            .create();

        let session = test_session(&server);
        post_unit(
            "/project/p1/update-status",
            None,
            Some(&json!({ "status": "Live" })),
            Some(&session),
            &CallOptions::idempotency_token("tok-1"),
        )
        .unwrap();
        post_unit(
            "/project/p2/update-status",
            None,
            Some(&json!({ "status": "Live" })),
            Some(&session),
            &CallOptions::default(),
        )
        .unwrap();

        with_token.assert();
        without_token.assert();
    }

    #[test]
    fn test_get_bytes_returns_raw_payload() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/v1/project/p1/export")
            .with_status(200)
            .with_body("raw,bytes,here")
            .create();

        let session = test_session(&server);
        let bytes = get_bytes(
            "/project/p1/export",
            None,
            Some(&session),
            &CallOptions::default(),
        )
        .unwrap();
        assert_eq!(bytes, b"raw,bytes,here");
    }

    #[test]
    fn test_request_returns_raw_response_on_success() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/v1/account")
            .with_status(204)
            .create();

        let session = test_session(&server);
        let response = request::<NoBody>(
            Method::GET,
            "/account",
            None,
            None,
            Some(&session),
            &CallOptions::default(),
        )
        .unwrap();
        assert_eq!(response.status().as_u16(), 204);
    }
}
