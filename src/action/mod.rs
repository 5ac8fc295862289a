// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deferred API calls.
//!
//! Every client operation that may touch the network returns a
//! [`RestAction`] rather than a result. Nothing is sent until the action is
//! run, either by awaiting [`RestAction::execute`] or by handing it to a
//! background task with one of the `queue` methods.
//!
//! | Action | Endpoint | Output |
//! |--------|----------|--------|
//! | Fetch all | `GET /1/shockers/own` | `Vec<DeviceHub>` |
//! | Fetch one | `GET /1/shockers/{id}` | `Option<Shocker>` |
//! | [`ControlRequestAction`] | `POST /2/shockers/control` | `bool` |
//!
//! # Examples
//!
//! ```no_run
//! use openshock_lib::{ClientConfig, OpenShock};
//!
//! # async fn example() -> openshock_lib::Result<()> {
//! let client = OpenShock::new(ClientConfig::new("token"))?;
//!
//! // Wait for the result
//! let hubs = client.retrieve_all_shockers().execute().await?;
//!
//! // Or run it in the background
//! client.retrieve_all_shockers().queue_with(
//!     |hubs| println!("{} hubs", hubs.len()),
//!     |err| eprintln!("sync failed: {err}"),
//! );
//! # Ok(())
//! # }
//! ```

mod control;
pub(crate) mod fetch;

pub use control::{ControlRequest, ControlRequestAction, ShockControl};

use std::fmt;

use tokio::task::JoinHandle;

use crate::error::{ProtocolError, Result};
use crate::protocol::{ApiRequest, HttpTransport, RequestHook, RestResponse};

type Decoder<T> = Box<dyn FnOnce(RestResponse) -> Result<T> + Send>;

enum ActionKind<T> {
    /// Outcome known up front, nothing to send.
    Completed(Result<T>),
    Request {
        transport: HttpTransport,
        request: ApiRequest,
        decoder: Decoder<T>,
    },
}

/// A deferred API call producing a `T`.
///
/// Actions are single-use: running one consumes it.
#[must_use = "actions do nothing until executed or queued"]
pub struct RestAction<T> {
    kind: ActionKind<T>,
}

impl<T> RestAction<T> {
    /// Creates an action that sends `request` and turns the response into a
    /// `T` with `decoder`.
    ///
    /// The decoder sees every delivered response, whatever its status.
    pub fn new<D>(transport: HttpTransport, request: ApiRequest, decoder: D) -> Self
    where
        D: FnOnce(RestResponse) -> Result<T> + Send + 'static,
    {
        Self {
            kind: ActionKind::Request {
                transport,
                request,
                decoder: Box::new(decoder),
            },
        }
    }

    /// Creates an action whose value is already known. No request is made.
    pub fn completed(value: T) -> Self {
        Self {
            kind: ActionKind::Completed(Ok(value)),
        }
    }

    /// Creates an action that fails with `error` without making a request.
    pub fn failed(error: impl Into<crate::Error>) -> Self {
        Self {
            kind: ActionKind::Completed(Err(error.into())),
        }
    }

    /// Installs a hook that customizes the outgoing request (extra headers,
    /// different body, ...). Has no effect on completed actions.
    pub fn with_request_hook(mut self, hook: RequestHook) -> Self {
        if let ActionKind::Request { request, .. } = &mut self.kind {
            *request = request.clone().with_hook(hook);
        }
        self
    }

    /// Returns the request this action will send, or `None` if the outcome
    /// is already known.
    #[must_use]
    pub fn request(&self) -> Option<&ApiRequest> {
        match &self.kind {
            ActionKind::Request { request, .. } => Some(request),
            ActionKind::Completed(_) => None,
        }
    }

    /// Returns `true` if running this action will not touch the network.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.kind, ActionKind::Completed(_))
    }

    /// Sends the request and decodes the response.
    ///
    /// Transport failures are retried according to the client configuration;
    /// HTTP error statuses are handed to the decoder and never retried.
    ///
    /// # Errors
    ///
    /// Returns the transport error once retries are exhausted, or whatever
    /// error the decoder produces.
    pub async fn execute(self) -> Result<T> {
        match self.kind {
            ActionKind::Completed(outcome) => outcome,
            ActionKind::Request {
                transport,
                request,
                decoder,
            } => {
                let response = transport.send(&request).await?;
                decoder(response)
            }
        }
    }
}

impl<T: Send + 'static> RestAction<T> {
    /// Runs the action on a background task and returns immediately.
    ///
    /// The result is discarded; a failure is logged.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn queue(self) -> JoinHandle<()> {
        self.queue_with(
            |_| {},
            |err| tracing::warn!(error = %err, "Queued action failed"),
        )
    }

    /// Runs the action on a background task and passes the value to
    /// `on_success`. A failure is logged as an error.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn queue_then<S>(self, on_success: S) -> JoinHandle<()>
    where
        S: FnOnce(T) + Send + 'static,
    {
        self.queue_with(on_success, |err| {
            tracing::error!(error = %err, "Unhandled failure in queued action");
        })
    }

    /// Runs the action on a background task; exactly one of the callbacks is
    /// invoked with the outcome.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn queue_with<S, F>(self, on_success: S, on_failure: F) -> JoinHandle<()>
    where
        S: FnOnce(T) + Send + 'static,
        F: FnOnce(crate::Error) + Send + 'static,
    {
        tokio::spawn(async move {
            match self.execute().await {
                Ok(value) => on_success(value),
                Err(err) => on_failure(err),
            }
        })
    }

    /// Runs the action on a background task and returns a handle to its
    /// outcome.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn(self) -> JoinHandle<Result<T>> {
        tokio::spawn(self.execute())
    }
}

impl RestAction<()> {
    /// Creates an action with the default decoder: succeeds only on
    /// status 200 and ignores the body.
    pub fn expect_ok(transport: HttpTransport, request: ApiRequest) -> Self {
        Self::new(transport, request, |response| {
            response.ensure_ok().map(|_| ())
        })
    }
}

impl<T> fmt::Debug for RestAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActionKind::Completed(outcome) => f
                .debug_struct("RestAction")
                .field("completed", &outcome.is_ok())
                .finish(),
            ActionKind::Request { request, .. } => f
                .debug_struct("RestAction")
                .field("request", request)
                .finish_non_exhaustive(),
        }
    }
}

/// Awaits a spawned action, mapping a join failure into a protocol error.
///
/// # Errors
///
/// Returns the action's own error, or `ProtocolError::TaskFailed` if the
/// task panicked or was cancelled.
pub async fn join<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
    handle
        .await
        .map_err(|e| ProtocolError::TaskFailed(e.to_string()))?
}
