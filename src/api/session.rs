//
//  crconnect
//  api/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Authenticated sessions and the default-session registry.
//!
//! Every Connect API call must carry a valid API key in the `X-API-KEY`
//! header. A [`Session`] binds that key to a reusable HTTP client so the key
//! persists across requests. Sessions are created explicitly with
//! [`create_session`] and may optionally be registered as the process-wide
//! default, which is used whenever a call site passes `None` for its session
//! argument.
//!
//! # Registry Semantics
//!
//! - At most one default session is active at a time; registering a new one
//!   replaces it (last writer wins), it is never merged or destroyed.
//! - Registration is a single atomic reference replacement behind a
//!   read/write lock: concurrent readers observe either the old or the new
//!   session, never a partial value.
//! - A session is owned by the caller; there is no automatic teardown.
//!
//! # Example
//!
//! ```rust,no_run
//! // Register a default session once at startup…
//! crconnect::create_session("your-api-key", true)?;
//!
//! // …or keep the session explicit and skip the registry entirely.
//! let session = crconnect::create_session("another-key", false)?;
//! # Ok::<(), crconnect::Error>(())
//! ```

use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};

use super::client::BASE_URL;
use super::common::Error;

/// Header carrying the API key, set once per session at creation.
pub(crate) const API_KEY_HEADER: &str = "X-API-KEY";

/// The most recently registered default session, if any.
static DEFAULT_SESSION: Lazy<RwLock<Option<Session>>> = Lazy::new(|| RwLock::new(None));

/// An authenticated transport handle for the Connect API.
///
/// A `Session` owns a blocking HTTP client whose default headers carry the
/// API key supplied at creation time. Cloning a session is cheap (the
/// underlying client is reference-counted) and both clones share the same
/// connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use crconnect::api::{account, client::CallOptions};
///
/// let session = crconnect::create_session("your-api-key", false)?;
/// let info = account::get_info(Some(&session), &CallOptions::default())?;
/// # Ok::<(), crconnect::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    /// The underlying HTTP client, with `X-API-KEY` in its default headers.
    http: Client,
    /// Base URL requests are issued against. [`BASE_URL`] unless overridden.
    base_url: String,
}

impl Session {
    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Points this session at a different base host.
    ///
    /// Intended for test doubles and staging environments; production callers
    /// never need it. The `/api/{version}` path prefix is still appended to
    /// whatever base is configured here.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// let session = crconnect::create_session("key", false)?
    ///     .with_base_url("http://127.0.0.1:8080");
    /// # Ok::<(), crconnect::Error>(())
    /// ```
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Creates a new session that uses `api_key` for all subsequent requests.
///
/// # Parameters
///
/// * `api_key` - The CloudResearch Connect API key.
/// * `set_as_default` - When `true`, the process-wide default session is
///   replaced with the newly created one.
///
/// # Errors
///
/// Returns [`Error::InvalidApiKey`] if the key cannot be used as an HTTP
/// header value, or [`Error::Network`] if the HTTP client cannot be built.
/// No network activity takes place; construction is purely local.
pub fn create_session(api_key: &str, set_as_default: bool) -> Result<Session, Error> {
    let mut value = HeaderValue::from_str(api_key)?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(API_KEY_HEADER, value);

    let http = Client::builder()
        .user_agent(format!("crconnect/{}", crate::VERSION))
        .default_headers(headers)
        .build()?;

    let session = Session {
        http,
        base_url: BASE_URL.to_string(),
    };

    if set_as_default {
        set_default_session(session.clone());
    }

    Ok(session)
}

/// Replaces the process-wide default session with `session`.
///
/// Last writer wins. Calls that pass `None` for their session argument will
/// use the session registered here from this point on.
pub fn set_default_session(session: Session) {
    *DEFAULT_SESSION
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(session);
}

/// Resolves the session a request should use: the explicit one if provided,
/// otherwise the registered default.
///
/// # Errors
///
/// Returns [`Error::NoSession`] if neither exists. This fires before any
/// network activity.
pub(crate) fn resolve(explicit: Option<&Session>) -> Result<Session, Error> {
    if let Some(session) = explicit {
        return Ok(session.clone());
    }

    DEFAULT_SESSION
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(Error::NoSession)
}

#[cfg(test)]
pub(crate) fn clear_default_session() {
    *DEFAULT_SESSION
        .write()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

/// Serializes tests that touch the process-wide registry.
#[cfg(test)]
pub(crate) static REGISTRY_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
