// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.

use std::fmt;
use std::time::Duration;

/// Configuration for an [`OpenShock`](crate::OpenShock) client.
///
/// The configuration is immutable once handed to the client.
///
/// # Examples
///
/// ```
/// use openshock_lib::ClientConfig;
/// use std::time::Duration;
///
/// // Defaults: public API host, 10 s timeout, 3 retries
/// let config = ClientConfig::new("my-token");
/// assert_eq!(config.api_host(), "https://api.openshock.app");
///
/// // Self-hosted backend
/// let config = ClientConfig::new("my-token")
///     .with_api_host("https://shock.example.org")
///     .with_custom_name("Bedroom panel")
///     .with_timeout(Duration::from_secs(5))
///     .with_max_retries(1);
/// assert_eq!(config.max_retries(), 1);
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    token: String,
    api_host: String,
    custom_name: String,
    timeout: Duration,
    max_retries: u32,
}

impl ClientConfig {
    /// Default API origin.
    pub const DEFAULT_API_HOST: &'static str = "https://api.openshock.app";
    /// Default display name sent with control requests.
    pub const DEFAULT_CUSTOM_NAME: &'static str = "openshock_lib";
    /// Default per-attempt request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default number of re-sends after a transport failure.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Creates a configuration for the given API token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_host: Self::DEFAULT_API_HOST.to_string(),
            custom_name: Self::DEFAULT_CUSTOM_NAME.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            max_retries: Self::DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the API host, e.g. for a self-hosted backend.
    #[must_use]
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    /// Sets the display name attached to control requests.
    #[must_use]
    pub fn with_custom_name(mut self, custom_name: impl Into<String>) -> Self {
        self.custom_name = custom_name.into();
        self
    }

    /// Sets the per-attempt request timeout.
    ///
    /// A timed out attempt counts as a transport failure and is retried.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many times a request is re-sent after a transport failure.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Returns the API token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the API host.
    #[must_use]
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Returns the display name attached to control requests.
    #[must_use]
    pub fn custom_name(&self) -> &str {
        &self.custom_name
    }

    /// Returns the per-attempt request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the number of re-sends after a transport failure.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Joins the API host and an endpoint path with exactly one slash
    /// between them when neither side provides one.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let separator = if self.api_host.ends_with('/') || path.starts_with('/') {
            ""
        } else {
            "/"
        };
        format!("{}{separator}{path}", self.api_host)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("custom_name", &self.custom_name)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
