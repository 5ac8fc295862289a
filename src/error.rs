// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `OpenShock` client.
//!
//! Failures fall into four groups: value validation (raised before any
//! network activity), transport problems (retried), unexpected HTTP status
//! codes (never retried) and serialization of request bodies.
//!
//! Malformed or incomplete payloads on the read endpoints are *not* errors;
//! those decoders skip what they cannot understand.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A control value was rejected before sending.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The request could not be delivered.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server answered with a status the action does not accept.
    #[error("request failed with status code {status}")]
    Status {
        /// HTTP status code returned by the server.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// A request or response body could not be (de)serialized.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Returns the HTTP status code if this is a status error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the error came from the transport layer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Control intensity is outside `[0, 100]`.
    #[error("intensity {0} is out of range [0, 100]")]
    InvalidIntensity(u8),

    /// Control duration is outside `[0, max]` milliseconds.
    #[error("duration {actual} ms is out of range [0, {max}]")]
    InvalidDuration {
        /// Maximum allowed duration in milliseconds.
        max: u32,
        /// The duration that was provided.
        actual: u64,
    },
}

/// Errors related to HTTP communication with the API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Every attempt failed; carries the error of the final attempt.
    #[error("request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Transport error of the last attempt.
        last: reqwest::Error,
    },

    /// Invalid API host or request path.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The API token cannot be used as a header value.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// A queued action's background task did not complete.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

/// Errors related to (de)serializing API payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
