// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of the shocker listing endpoints.
//!
//! These decoders are lenient: records that lack a required field or have
//! the wrong shape are skipped and logged, never reported as errors.

use serde::Deserialize;
use serde_json::Value;

use crate::types::{DeviceHub, Shocker};

/// Shocker record as sent by the API. Every field is optional so that a
/// single bad record never fails the whole payload.
///
/// `rfId`, `isPaused` and `device` are kept raw and read per field, so a
/// value of an unexpected type falls back to its default.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShockerRecord {
    id: Option<String>,
    name: Option<String>,
    model: Option<String>,
    #[serde(default)]
    rf_id: Value,
    #[serde(default)]
    is_paused: Value,
    /// Owning hub id, only present on the single-shocker endpoint.
    #[serde(default)]
    device: Value,
}

impl ShockerRecord {
    fn into_shocker(self, hub_id: Option<String>) -> Option<Shocker> {
        let (Some(id), Some(name), Some(model)) = (self.id, self.name, self.model) else {
            return None;
        };
        Some(Shocker::new(
            id,
            name,
            self.rf_id.as_i64().unwrap_or(0),
            model,
            self.is_paused.as_bool().unwrap_or(false),
            hub_id.or_else(|| self.device.as_str().map(str::to_string)),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct HubRecord {
    id: Option<String>,
    name: Option<String>,
    shockers: Option<Value>,
}

fn decode_record(value: &Value, hub_id: Option<&str>) -> Option<Shocker> {
    match ShockerRecord::deserialize(value) {
        Ok(record) => {
            let shocker = record.into_shocker(hub_id.map(str::to_string));
            if shocker.is_none() {
                tracing::warn!(hub = ?hub_id, "Skipping shocker record without id, name or model");
            }
            shocker
        }
        Err(e) => {
            tracing::warn!(hub = ?hub_id, error = %e, "Skipping malformed shocker record");
            None
        }
    }
}

/// Decodes the body of `GET /1/shockers/own`.
///
/// Returns each hub (without members) paired with its decoded shockers. A
/// missing or non-array `data` field yields an empty list. Hubs without `id`,
/// `name` or a `shockers` field are skipped, as are shockers without `id`,
/// `name` or `model`. A missing or mistyped `rfId` reads as 0 and `isPaused`
/// as `false`.
///
/// # Examples
///
/// ```
/// use openshock_lib::response::decode_own_shockers;
///
/// let body = serde_json::json!({
///     "data": [{
///         "id": "g1",
///         "name": "Hub1",
///         "shockers": [{"id": "s1", "name": "Dev1", "rfId": 123, "model": "X"}]
///     }]
/// });
///
/// let hubs = decode_own_shockers(&body);
/// assert_eq!(hubs.len(), 1);
/// assert_eq!(hubs[0].1[0].hub_id(), Some("g1"));
/// ```
#[must_use]
pub fn decode_own_shockers(body: &Value) -> Vec<(DeviceHub, Vec<Shocker>)> {
    let Some(data) = body.get("data").and_then(Value::as_array) else {
        tracing::debug!("Shocker listing has no data array");
        return Vec::new();
    };

    data.iter()
        .filter_map(|entry| {
            let record = match HubRecord::deserialize(entry) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed hub record");
                    return None;
                }
            };
            let (Some(id), Some(name)) = (record.id, record.name) else {
                tracing::warn!("Skipping hub record without id or name");
                return None;
            };
            let Some(members) = record.shockers else {
                tracing::debug!(hub = %id, "Skipping hub record without shockers");
                return None;
            };

            let shockers: Vec<Shocker> = members
                .as_array()
                .map(|list| {
                    list.iter()
                        .filter_map(|value| decode_record(value, Some(id.as_str())))
                        .collect()
                })
                .unwrap_or_default();

            Some((DeviceHub::new(id, name), shockers))
        })
        .collect()
}

/// Decodes the body of `GET /1/shockers/{id}`: `{"data": {...}}`.
///
/// Returns `None` if `data` is missing or the record is incomplete.
#[must_use]
pub fn decode_shocker(body: &Value) -> Option<Shocker> {
    let data = body.get("data").filter(|d| d.is_object())?;
    decode_record(data, None)
}
