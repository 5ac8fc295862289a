// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batched control requests.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::action::RestAction;
use crate::error::{Error, ParseError, Result, ValueError};
use crate::protocol::{ApiRequest, HttpTransport};
use crate::types::{ControlData, ControlType, Shocker};

/// Control endpoint.
pub(crate) const CONTROL_PATH: &str = "/2/shockers/control";

/// Body of `POST /2/shockers/control`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    /// Display name shown in the shocker's activity log.
    pub custom_name: String,
    /// One entry per targeted shocker.
    pub shocks: Vec<ShockControl>,
}

/// One shocker's entry in a [`ControlRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShockControl {
    /// Target shocker id.
    pub id: String,
    /// Command kind.
    #[serde(rename = "type")]
    pub kind: ControlType,
    /// Intensity, 0-100.
    pub intensity: u8,
    /// Duration in milliseconds.
    pub duration: u64,
}

/// Accumulates commands for several shockers and sends them as one request.
///
/// Commands are validated as they are added, so an out-of-range value fails
/// before anything is sent. Adding a second command for the same shocker
/// replaces the first. The whole batch succeeds or fails together.
///
/// # Examples
///
/// ```no_run
/// use openshock_lib::{ClientConfig, ControlData, ControlType, OpenShock};
///
/// # async fn example() -> openshock_lib::Result<()> {
/// let client = OpenShock::connect(ClientConfig::new("token")).await?;
/// let shockers = client.cached_shockers();
///
/// let mut batch = client.control();
/// for shocker in &shockers {
///     batch = batch.add(shocker, ControlData::new(ControlType::Vibrate, 40, 1_000))?;
/// }
/// batch.execute().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use = "control actions do nothing until executed or queued"]
pub struct ControlRequestAction {
    transport: HttpTransport,
    commands: Vec<(String, ControlData)>,
}

impl ControlRequestAction {
    pub(crate) fn new(transport: HttpTransport) -> Self {
        Self {
            transport,
            commands: Vec::new(),
        }
    }

    /// Adds a command for `shocker`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if intensity or duration is out of range.
    pub fn add(self, shocker: &Shocker, data: ControlData) -> std::result::Result<Self, ValueError> {
        self.add_by_id(shocker.id(), data)
    }

    /// Adds a command for the shocker with the given id.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if intensity or duration is out of range.
    pub fn add_by_id(
        mut self,
        shocker_id: impl Into<String>,
        data: ControlData,
    ) -> std::result::Result<Self, ValueError> {
        data.validate()?;

        let shocker_id = shocker_id.into();
        match self.commands.iter_mut().find(|(id, _)| *id == shocker_id) {
            Some((_, existing)) => *existing = data,
            None => self.commands.push((shocker_id, data)),
        }
        Ok(self)
    }

    /// Returns the number of targeted shockers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no command has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the request body this batch will send.
    #[must_use]
    pub fn body(&self) -> ControlRequest {
        ControlRequest {
            custom_name: self.transport.config().custom_name().to_string(),
            shocks: self
                .commands
                .iter()
                .map(|(id, data)| ShockControl {
                    id: id.clone(),
                    kind: data.kind(),
                    intensity: data.intensity(),
                    duration: data.duration_ms(),
                })
                .collect(),
        }
    }

    /// Turns the batch into a plain action.
    ///
    /// Succeeds with `true` on status 200; any other status is an error.
    pub fn into_action(self) -> RestAction<bool> {
        let body = match serde_json::to_string(&self.body()) {
            Ok(body) => body,
            Err(e) => return RestAction::failed(Error::Parse(ParseError::Json(e))),
        };

        tracing::debug!(shockers = self.commands.len(), "Prepared control request");

        RestAction::new(
            self.transport,
            ApiRequest::new(Method::POST, CONTROL_PATH).with_body(body),
            |response| response.ensure_ok().map(|_| true),
        )
    }

    /// Sends the batch and waits for the result.
    ///
    /// # Errors
    ///
    /// Returns a status error for any non-200 response, or the transport
    /// error once retries are exhausted.
    pub async fn execute(self) -> Result<bool> {
        self.into_action().execute().await
    }

    /// Sends the batch in the background; a failure is logged.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn queue(self) -> JoinHandle<()> {
        self.into_action().queue()
    }

    /// Sends the batch in the background and passes the result to
    /// `on_success`; a failure is logged as an error.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn queue_then<S>(self, on_success: S) -> JoinHandle<()>
    where
        S: FnOnce(bool) + Send + 'static,
    {
        self.into_action().queue_then(on_success)
    }

    /// Sends the batch in the background; exactly one callback runs.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn queue_with<S, F>(self, on_success: S, on_failure: F) -> JoinHandle<()>
    where
        S: FnOnce(bool) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        self.into_action().queue_with(on_success, on_failure)
    }
}

impl From<ControlRequestAction> for RestAction<bool> {
    fn from(action: ControlRequestAction) -> Self {
        action.into_action()
    }
}
