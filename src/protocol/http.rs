// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the `OpenShock` REST API.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Url};

use crate::config::ClientConfig;
use crate::error::ProtocolError;
use crate::protocol::RestResponse;

/// Header carrying the API token on every request.
pub const TOKEN_HEADER: &str = "OpenShockToken";

const JSON: &str = "application/json";

/// Hook applied to every outgoing request right before it is sent.
///
/// The hook runs once per attempt, so it must be repeatable.
pub type RequestHook = Arc<dyn Fn(RequestBuilder) -> RequestBuilder + Send + Sync>;

// ============================================================================
// ApiRequest - Description of one outgoing call
// ============================================================================

/// Description of one outgoing API call, relative to the configured host.
///
/// # Examples
///
/// ```
/// use openshock_lib::protocol::ApiRequest;
/// use reqwest::Method;
///
/// let request = ApiRequest::get("/1/shockers/own");
/// assert_eq!(request.path(), "/1/shockers/own");
///
/// let request = ApiRequest::new(Method::POST, "/2/shockers/control")
///     .with_body(r#"{"shocks":[]}"#);
/// assert!(request.body().is_some());
/// ```
#[derive(Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<String>,
    content_type: Option<String>,
    hook: Option<RequestHook>,
}

impl ApiRequest {
    /// Creates a request without a body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            content_type: None,
            hook: None,
        }
    }

    /// Shorthand for a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Attaches a body. Ignored for `GET` requests and empty bodies.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Overrides the `Content-Type` sent with a body (default `application/json`).
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Installs a hook that can add headers or otherwise customize the request.
    #[must_use]
    pub fn with_hook(mut self, hook: RequestHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the endpoint path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the body that will actually be sent.
    fn effective_body(&self) -> Option<&str> {
        if self.method == Method::GET {
            return None;
        }
        self.body.as_deref().filter(|b| !b.is_empty())
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("body", &self.body)
            .field("content_type", &self.content_type)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

// ============================================================================
// HttpTransport - Shared HTTP client
// ============================================================================

/// Sends [`ApiRequest`]s to the configured API host.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
    token: HeaderValue,
}

impl HttpTransport {
    /// Creates a transport from a client configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API host is not a valid URL, the token is not a
    /// valid header value, or the HTTP client cannot be created.
    pub fn new(config: Arc<ClientConfig>) -> Result<Self, ProtocolError> {
        Url::parse(config.api_host())
            .map_err(|e| ProtocolError::InvalidAddress(format!("{}: {e}", config.api_host())))?;

        let mut token = HeaderValue::from_str(config.token())
            .map_err(|e| ProtocolError::InvalidToken(e.to_string()))?;
        token.set_sensitive(true);

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            client,
            config,
            token,
        })
    }

    /// Returns the configuration this transport was built from.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds the full request for one attempt.
    fn build_request(&self, request: &ApiRequest) -> RequestBuilder {
        let url = self.config.url_for(request.path());

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(ACCEPT, JSON)
            .header(TOKEN_HEADER, self.token.clone());

        if let Some(body) = request.effective_body() {
            let content_type = request.content_type.as_deref().unwrap_or(JSON);
            builder = builder
                .header(CONTENT_TYPE, content_type)
                .body(body.to_string());
        }

        match &request.hook {
            Some(hook) => hook(builder),
            None => builder,
        }
    }

    /// Sends the request, re-sending immediately on transport failure.
    ///
    /// Any HTTP status, including error statuses, counts as a delivered
    /// response and is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` once every attempt has failed at the transport
    /// level.
    pub async fn send(&self, request: &ApiRequest) -> Result<RestResponse, ProtocolError> {
        let attempts = self.config.max_retries().saturating_add(1);
        let mut attempt = 1;

        loop {
            match self.send_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_builder() => return Err(ProtocolError::Http(e)),
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        error = %e,
                        "Transport failure, retrying"
                    );
                    attempt += 1;
                }
                Err(e) if attempts == 1 => return Err(ProtocolError::Http(e)),
                Err(e) => {
                    return Err(ProtocolError::RetriesExhausted { attempts, last: e });
                }
            }
        }
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<RestResponse, reqwest::Error> {
        tracing::debug!(method = %request.method, path = %request.path, "Sending API request");

        let response = self.build_request(request).send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        tracing::debug!(status, body_len = body.len(), "Received API response");

        Ok(RestResponse::new(status, headers, body))
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
