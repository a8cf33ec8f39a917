//
//  crconnect
//  api/account.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Account information for the authenticated researcher.

use serde::{Deserialize, Serialize};

use super::client::{self, CallOptions};
use super::common::Error;
use super::session::Session;

/// Balance information for the authenticated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// The available balance, in USD, that is left in your account.
    pub account_balance: f64,
}

/// Retrieves account information.
///
/// # Parameters
///
/// * `session` - The session to use; `None` uses the registered default.
/// * `opts` - Per-call options forwarded to the transport.
///
/// # Errors
///
/// [`Error::Api`] on 400 (bad request) or 401 (invalid API key or
/// unauthorized resource access), plus the usual session/transport kinds.
///
/// # Example
///
/// ```rust,no_run
/// use crconnect::api::{account, client::CallOptions};
///
/// crconnect::create_session("your-api-key", true)?;
/// let info = account::get_info(None, &CallOptions::default())?;
/// println!("balance: {}", info.account_balance);
/// # Ok::<(), crconnect::Error>(())
/// ```
pub fn get_info(session: Option<&Session>, opts: &CallOptions) -> Result<AccountInfo, Error> {
    client::get("/account", None, session, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_info_decodes_balance() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v1/account")
            .match_header("X-API-KEY", "test-key")
            .with_body(r#"{"accountBalance": 125.50}"#)
            .expect(1)
            .create();

        let session = crate::create_session("test-key", false)
            .unwrap()
            .with_base_url(server.url());
        let info = get_info(Some(&session), &CallOptions::default()).unwrap();

        assert_eq!(info.account_balance, 125.50);
        mock.assert();
    }
}
