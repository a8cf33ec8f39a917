//
//  crconnect
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # CloudResearch Connect Client Library
//!
//! A typed, synchronous Rust client for the CloudResearch Connect REST API:
//! account balance lookup, project CRUD and lifecycle management, assignment
//! approval/rejection/bonus workflows, and demographic targeting/feasibility
//! queries.
//!
//! ## Overview
//!
//! Every API call is an authenticated HTTPS request against
//! `connect-api.cloudresearch.com`. This crate translates function calls into
//! those requests and parses the responses into plain data structures; it does
//! not retry, cache, rate-limit, or schedule anything on its own. Each call
//! blocks the calling thread until the transport completes or fails.
//!
//! ## Getting Started
//!
//! Create a [`Session`] with your API key. By default the new session becomes
//! the process-wide default, so subsequent calls can pass `None` for the
//! session argument:
//!
//! ```rust,no_run
//! use crconnect::api::{account, client::CallOptions};
//!
//! crconnect::create_session("your-api-key", true)?;
//!
//! let info = account::get_info(None, &CallOptions::default())?;
//! println!("Available balance: {}", info.account_balance);
//! # Ok::<(), crconnect::Error>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`api::client`]: Request executor, URL/query building, HTTP verb facade
//! - [`api::session`]: Authenticated sessions and the default-session registry
//! - [`api::common`]: Error taxonomy and cursor-based pagination
//! - [`api::account`]: Account balance lookup
//! - [`api::project`]: Project CRUD, lifecycle, listing, and statistics
//! - [`api::assignments`]: Assignment approval, rejection, and bonus payments
//! - [`api::demographics`]: Demographic targeting and feasibility queries
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Error). Callers should
//! be prepared for three kinds of failure at every call site that performs
//! network I/O, including every page advance of a [`Paginator`]:
//!
//! | Kind | Variant | Retried internally |
//! |------|---------|--------------------|
//! | No session resolvable | [`Error::NoSession`] | Never |
//! | Non-2xx API response | [`Error::Api`] | Never |
//! | Transport failure (DNS, timeout, reset) | [`Error::Network`] | Never |
//!
//! ## Concurrency
//!
//! The crate is synchronous and keeps no state other than the default-session
//! registry, which is a single atomic reference replacement: concurrent
//! readers observe either the old or the new session, never a partial value.
//! A [`Paginator`] instance is single-pass and must not be advanced from
//! multiple threads at once.

/// API client implementation for the CloudResearch Connect platform.
///
/// Contains the shared request plumbing ([`api::client`], [`api::session`],
/// [`api::common`]) and one facade module per API resource.
pub mod api;

pub use api::client::{CallOptions, Query, BASE_URL};
pub use api::common::{ApiErrorData, Error, Page, Paginator};
pub use api::session::{create_session, set_default_session, Session};

/// Crate version, sent as part of the `User-Agent` header on every request.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
