// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response decoding for the `OpenShock` JSON API.
//!
//! Decoders here are pure functions from a parsed JSON tree to domain
//! values. The read endpoints are decoded leniently; see [`shockers`] for
//! the exact rules.

pub mod shockers;

pub use shockers::{decode_own_shockers, decode_shocker};
