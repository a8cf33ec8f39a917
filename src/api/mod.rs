//
//  crconnect
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP plumbing and resource facades for the
//! CloudResearch Connect REST API at `connect-api.cloudresearch.com`.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`client`]: Core request executor with URL building, query encoding,
//!   verb facade, and unified error mapping
//! - [`session`]: Authenticated sessions carrying the `X-API-KEY` header,
//!   plus the process-wide default-session registry
//! - [`common`]: Shared types (error taxonomy, pagination)
//! - [`account`], [`project`], [`assignments`], [`demographics`]: Thin
//!   resource facades layered on the verb facade
//!
//! ## Data Flow
//!
//! ```text
//! caller → resource facade → verb facade → request executor
//!                                            ├── session registry
//!                                            ├── URL builder + query encoder
//!                                            └── transport (reqwest, blocking)
//! ```
//!
//! The [`common::Paginator`] sits beside the executor, driving repeated GET
//! requests and threading the server-issued `nextToken` cursor.

/// Account balance lookup.
pub mod account;

/// Assignment approval, rejection, reversal, and bonus workflows.
pub mod assignments;

/// Core HTTP request executor and verb facade.
///
/// Provides [`client::request`] and the typed `get`/`post`/`put`/`patch`/
/// `delete` wrappers, along with query-string encoding and endpoint URL
/// construction.
pub mod client;

/// Common types shared by every endpoint.
///
/// Includes:
/// - [`common::Error`]: Unified error taxonomy
/// - [`common::ApiErrorData`]: Parsed non-2xx error envelope
/// - [`common::Page`] / [`common::Paginator`]: Cursor-based pagination
pub mod common;

/// Demographic targeting catalogue and project feasibility.
pub mod demographics;

/// Project CRUD, lifecycle transitions, listing, and statistics.
pub mod project;

/// Session creation and the process-wide default-session registry.
pub mod session;

pub use common::{ApiErrorData, Error};
pub use session::{create_session, Session};
