// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topology fetch actions. Both populate the device cache while decoding.

use std::sync::Arc;

use crate::action::RestAction;
use crate::cache::DeviceCache;
use crate::protocol::{ApiRequest, HttpTransport};
use crate::response::{decode_own_shockers, decode_shocker};
use crate::types::{DeviceHub, Shocker};

/// Lists every hub and shocker owned by the token's account.
pub(crate) const OWN_SHOCKERS_PATH: &str = "/1/shockers/own";

/// Path of a single shocker.
pub(crate) fn shocker_path(id: &str) -> String {
    format!("/1/shockers/{}", urlencoding::encode(id))
}

/// Fetches the full hub/shocker topology and registers every decoded hub.
///
/// Returns the hubs as stored in the cache, each carrying its shockers. A
/// non-200 status or an undecodable body yields an empty list and leaves the
/// cache untouched.
pub(crate) fn retrieve_all(
    transport: &HttpTransport,
    cache: Arc<DeviceCache>,
) -> RestAction<Vec<DeviceHub>> {
    RestAction::new(
        transport.clone(),
        ApiRequest::get(OWN_SHOCKERS_PATH),
        move |response| {
            if !response.is_ok() {
                tracing::warn!(
                    status = response.status(),
                    "Shocker listing request was not successful"
                );
                return Ok(Vec::new());
            }
            let Some(body) = response.json() else {
                return Ok(Vec::new());
            };

            let hubs: Vec<DeviceHub> = decode_own_shockers(&body)
                .into_iter()
                .map(|(hub, shockers)| cache.register_hub(hub, shockers))
                .collect();

            tracing::debug!(hubs = hubs.len(), "Synchronized shocker topology");
            Ok(hubs)
        },
    )
}

/// Fetches one shocker and registers it under its declared hub.
///
/// A non-200 status or an undecodable body yields `None`.
pub(crate) fn retrieve_one(
    transport: &HttpTransport,
    cache: Arc<DeviceCache>,
    id: &str,
) -> RestAction<Option<Shocker>> {
    let requested = id.to_string();
    RestAction::new(
        transport.clone(),
        ApiRequest::get(shocker_path(id)),
        move |response| {
            match response.status() {
                200 => {}
                404 => {
                    tracing::debug!(shocker = %requested, "Shocker not found");
                    return Ok(None);
                }
                status => {
                    tracing::warn!(
                        shocker = %requested,
                        status,
                        "Shocker request was not successful"
                    );
                    return Ok(None);
                }
            }

            let Some(shocker) = response.json().as_ref().and_then(decode_shocker) else {
                tracing::warn!(shocker = %requested, "Shocker response could not be decoded");
                return Ok(None);
            };

            cache.register_shocker(shocker.clone());
            Ok(Some(shocker))
        },
    )
}
