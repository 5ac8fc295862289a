// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `OpenShock` Lib - A Rust client for the `OpenShock` device control API.
//!
//! The API exposes hubs (gateways) and the shockers attached to them. This
//! library lists and looks up those devices and sends timed control
//! commands: shock, vibrate, sound and stop.
//!
//! # Actions
//!
//! Every network operation returns a [`RestAction`](action::RestAction) that
//! does nothing until it is run:
//!
//! - `execute().await` waits for the decoded result
//! - `queue()`, `queue_then(..)` and `queue_with(..)` run it on a background
//!   task and return immediately
//!
//! Transport failures are retried (3 times by default, no delay); HTTP error
//! statuses are not.
//!
//! # Caching
//!
//! Fetching the topology fills a [`DeviceCache`] owned by the client, so
//! later lookups are served locally.
//!
//! # Quick Start
//!
//! ```no_run
//! use openshock_lib::{ClientConfig, ControlData, ControlType, OpenShock};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> openshock_lib::Result<()> {
//!     let client = OpenShock::connect(ClientConfig::new("my-api-token")).await?;
//!
//!     for hub in client.hubs() {
//!         println!("{} ({} shockers)", hub.name(), hub.shockers().len());
//!     }
//!
//!     let Some(shocker) = client.cached_shockers().into_iter().next() else {
//!         return Ok(());
//!     };
//!
//!     // One shocker
//!     client.vibrate(&shocker, 25, Duration::from_millis(500))?.execute().await?;
//!
//!     // Several commands in one request
//!     client
//!         .control()
//!         .add(&shocker, ControlData::new(ControlType::Sound, 0, 1_000))?
//!         .execute()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod action;
mod cache;
mod client;
mod config;
pub mod error;
pub mod protocol;
pub mod response;
pub mod types;

pub use action::{ControlRequestAction, RestAction};
pub use cache::DeviceCache;
pub use client::OpenShock;
pub use config::ClientConfig;
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use types::{
    ControlData, ControlType, DeviceHub, MAX_INTENSITY, MAX_SHOCK_DURATION, Shocker,
};
