// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Domain value types.
//!
//! # Types
//!
//! - [`DeviceHub`] - A gateway and the shockers attached to it
//! - [`Shocker`] - A single controllable unit
//! - [`ControlType`] - Shock, Vibrate, Sound or Stop
//! - [`ControlData`] - Kind, intensity (0-100) and duration (0-30000 ms)

mod control;
mod hub;
mod shocker;

pub use control::{ControlData, ControlType, MAX_INTENSITY, MAX_SHOCK_DURATION};
pub use hub::DeviceHub;
pub use shocker::Shocker;
