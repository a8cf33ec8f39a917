//
//  crconnect
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Cursor-Based Pagination for Connect List Endpoints
//!
//! Connect list endpoints slice long result lists into pages and hand back an
//! opaque continuation marker:
//!
//! ```json
//! { "items": [ … ], "nextToken": "abc123" }
//! ```
//!
//! The client echoes `nextToken` back as the `NextToken` query parameter on
//! the subsequent call; a null or absent token is the terminal signal. The
//! [`Paginator`] drives that protocol as a lazy, pull-based [`Iterator`]:
//! construction performs no network call, each page is fetched only when the
//! previous page's items have been consumed, and the global ordering across
//! the traversal equals the server-provided order, page by page, item by
//! item within a page.
//!
//! # Single-Pass Contract
//!
//! A `Paginator` is single-pass: once it observes a null cursor (or an
//! error), it never issues another request. Re-iterating an exhausted
//! instance produces nothing further; a fresh traversal requires
//! constructing a new paginator with the original starting query.
//!
//! # Example
//!
//! ```rust,no_run
//! use crconnect::api::project::{self, FilterQuery, ProjectStatus};
//! use crconnect::api::client::CallOptions;
//!
//! crconnect::create_session("your-api-key", true)?;
//!
//! let query = FilterQuery {
//!     status: Some(ProjectStatus::Live),
//!     size: Some(50),
//!     ..FilterQuery::default()
//! };
//! for project in project::list_all(Some(query), None, &CallOptions::default()) {
//!     let project = project?;
//!     println!("{:?}", project.project_id);
//! }
//! # Ok::<(), crconnect::Error>(())
//! ```

use std::collections::VecDeque;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::Error;
use crate::api::client::{self, CallOptions, Query};
use crate::api::session::Session;

/// Query key under which the cursor is echoed back to the server.
pub(crate) const NEXT_TOKEN_KEY: &str = "NextToken";

/// One page of a paginated list response.
///
/// The item array is named `items` on most endpoints; the project listing
/// endpoint names it `projects`, which is accepted as an alias. An absent
/// array decodes as empty rather than failing.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// The items of this page, in server order.
    #[serde(default, alias = "projects")]
    pub items: Vec<T>,

    /// Opaque continuation marker; `None` means this is the last page.
    #[serde(default, rename = "nextToken")]
    pub next_token: Option<String>,
}

/// A lazy iterator over every item of a paginated list endpoint.
///
/// Yields `Result<T, Error>`: each page advance is a network call and can
/// fail with any of the error kinds in [`Error`]. An error fuses the
/// iterator; subsequent calls to `next()` return `None`.
///
/// Advancing one instance from multiple threads concurrently is not
/// supported; the working query is mutated between pages without a guard.
pub struct Paginator<T> {
    /// Endpoint path, fixed for the lifetime of the traversal.
    path: String,
    /// Working query; the cursor is merged in under [`NEXT_TOKEN_KEY`].
    query: Option<Map<String, Value>>,
    /// Session captured at construction; `None` defers to the registry on
    /// every page fetch.
    session: Option<Session>,
    /// Passthrough options applied to every page fetch.
    opts: CallOptions,
    /// Items of the current page not yet handed out.
    buffered: VecDeque<T>,
    /// Set once a null cursor or an error has been observed.
    exhausted: bool,
}

impl<T> Paginator<T> {
    /// Creates a paginator for `path` without touching the network.
    ///
    /// A raw-string starting query is parsed once into a mapping (naive
    /// split on `&` then `=`, no URL-decoding) so the cursor key can be
    /// merged in between pages; percent-encoded raw queries are therefore
    /// not preserved exactly.
    pub fn new(
        path: impl Into<String>,
        query: Option<Query>,
        session: Option<&Session>,
        opts: CallOptions,
    ) -> Self {
        Self {
            path: path.into(),
            query: query.map(Query::into_map),
            session: session.cloned(),
            opts,
            buffered: VecDeque::new(),
            exhausted: false,
        }
    }
}

impl<T: DeserializeOwned> Paginator<T> {
    /// Fetches the next page, buffers its items, and threads the cursor.
    fn fetch_page(&mut self) -> Result<(), Error> {
        let query = self.query.clone().map(Query::Map);
        let page: Page<T> = client::get(&self.path, query, self.session.as_ref(), &self.opts)?;
        tracing::debug!(
            path = %self.path,
            items = page.items.len(),
            has_next = page.next_token.is_some(),
            "fetched page"
        );

        self.buffered.extend(page.items);

        if page.next_token.is_none() {
            self.exhausted = true;
        }
        let cursor = page.next_token.map(Value::String).unwrap_or(Value::Null);
        self.query
            .get_or_insert_with(Map::new)
            .insert(NEXT_TOKEN_KEY.to_string(), cursor);

        Ok(())
    }
}

impl<T: DeserializeOwned> Iterator for Paginator<T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(item));
            }
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        id: String,
    }

    fn test_session(server: &mockito::Server) -> Session {
        crate::create_session("test-key", false)
            .unwrap()
            .with_base_url(server.url())
    }

    fn size_query(size: u64) -> Query {
        let mut map = Map::new();
        map.insert("Size".to_string(), json!(size));
        Query::Map(map)
    }

    #[test]
    fn test_three_pages_yield_all_items_in_order() {
        let mut server = mockito::Server::new();
        let page1 = server
            .mock("GET", "/api/v1/project")
            .match_query(Matcher::Exact("Size=2".to_string()))
            .with_body(r#"{"items":[{"id":"A"},{"id":"B"}],"nextToken":"t1"}"#)
            .expect(1)
            .create();
        let page2 = server
            .mock("GET", "/api/v1/project")
            .match_query(Matcher::Exact("Size=2&NextToken=t1".to_string()))
            .with_body(r#"{"items":[{"id":"C"}],"nextToken":"t2"}"#)
            .expect(1)
            .create();
        let page3 = server
            .mock("GET", "/api/v1/project")
            .match_query(Matcher::Exact("Size=2&NextToken=t2".to_string()))
            .with_body(r#"{"items":[{"id":"D"}],"nextToken":null}"#)
            .expect(1)
            .create();

        let session = test_session(&server);
        let mut paginator: Paginator<Item> = Paginator::new(
            "/project",
            Some(size_query(2)),
            Some(&session),
            CallOptions::default(),
        );

        let ids: Vec<String> = paginator
            .by_ref()
            .map(|item| item.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["A", "B", "C", "D"]);

        // Exhausted instances never issue another request.
        assert!(paginator.next().is_none());

        page1.assert();
        page2.assert();
        page3.assert();
    }

    #[test]
    fn test_construction_performs_no_network_call() {
        let mut server = mockito::Server::new();
        let spy = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create();

        let session = test_session(&server);
        let _paginator: Paginator<Item> =
            Paginator::new("/project", None, Some(&session), CallOptions::default());

        spy.assert();
    }

    #[test]
    fn test_single_page_without_items_field() {
        let mut server = mockito::Server::new();
        let only = server
            .mock("GET", "/api/v1/project")
            .with_body(r#"{"nextToken":null}"#)
            .expect(1)
            .create();

        let session = test_session(&server);
        let mut paginator: Paginator<Item> =
            Paginator::new("/project", None, Some(&session), CallOptions::default());

        assert!(paginator.next().is_none());
        assert!(paginator.next().is_none());
        only.assert();
    }

    #[test]
    fn test_project_alias_for_item_array() {
        let page: Page<Item> =
            serde_json::from_str(r#"{"projects":[{"id":"A"}],"nextToken":null}"#).unwrap();
        assert_eq!(page.items, vec![Item { id: "A".to_string() }]);
        assert!(page.next_token.is_none());
    }

    #[test]
    fn test_raw_string_starting_query_is_parsed_once() {
        let mut server = mockito::Server::new();
        let page1 = server
            .mock("GET", "/api/v1/project")
            .match_query(Matcher::Exact("Status=Live".to_string()))
            .with_body(r#"{"items":[{"id":"A"}],"nextToken":"t1"}"#)
            .expect(1)
            .create();
        let page2 = server
            .mock("GET", "/api/v1/project")
            .match_query(Matcher::Exact("Status=Live&NextToken=t1".to_string()))
            .with_body(r#"{"items":[],"nextToken":null}"#)
            .expect(1)
            .create();

        let session = test_session(&server);
        let paginator: Paginator<Item> = Paginator::new(
            "/project",
            Some(Query::from("Status=Live")),
            Some(&session),
            CallOptions::default(),
        );

        let ids: Vec<String> = paginator.map(|item| item.unwrap().id).collect();
        assert_eq!(ids, vec!["A"]);

        page1.assert();
        page2.assert();
    }

    #[test]
    fn test_error_on_page_advance_fuses_the_iterator() {
        let mut server = mockito::Server::new();
        let page1 = server
            .mock("GET", "/api/v1/project")
            .match_query(Matcher::Exact("Size=1".to_string()))
            .with_body(r#"{"items":[{"id":"A"}],"nextToken":"t1"}"#)
            .expect(1)
            .create();
        let page2 = server
            .mock("GET", "/api/v1/project")
            .match_query(Matcher::Exact("Size=1&NextToken=t1".to_string()))
            .with_status(500)
            .with_body("{}")
            .expect(1)
            .create();

        let session = test_session(&server);
        let mut paginator: Paginator<Item> = Paginator::new(
            "/project",
            Some(size_query(1)),
            Some(&session),
            CallOptions::default(),
        );

        assert_eq!(paginator.next().unwrap().unwrap().id, "A");
        match paginator.next() {
            Some(Err(Error::Api { status: 500, data })) => assert!(data.is_none()),
            other => panic!("expected Error::Api, got {other:?}"),
        }
        assert!(paginator.next().is_none());

        page1.assert();
        page2.assert();
    }
}
