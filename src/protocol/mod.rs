// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP plumbing for talking to the `OpenShock` API.
//!
//! [`HttpTransport`] turns an [`ApiRequest`] into a real HTTP call, attaching
//! the standard headers and re-sending on transport failures. The raw outcome
//! is handed back as a [`RestResponse`] for the caller's decoder to inspect.

mod http;

pub use http::{ApiRequest, HttpTransport, RequestHook, TOKEN_HEADER};

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::{Error, ParseError};

/// Raw response of one API call.
#[derive(Debug, Clone)]
pub struct RestResponse {
    status: u16,
    headers: HeaderMap,
    body: String,
}

impl RestResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` if the status is exactly 200.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Fails with [`Error::Status`] unless the status is exactly 200.
    ///
    /// # Errors
    ///
    /// Returns `Error::Status` carrying the status code and body.
    pub fn ensure_ok(self) -> Result<Self, Error> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(Error::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Leniently parses the body as a JSON tree.
    ///
    /// Returns `None` for non-200 responses, empty bodies and bodies that are
    /// not valid JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        if !self.is_ok() || self.body.trim().is_empty() {
            return None;
        }
        match serde_json::from_str(&self.body) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "Response body is not valid JSON");
                None
            }
        }
    }

    /// Strictly parses the body as a specific type.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the body cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}
