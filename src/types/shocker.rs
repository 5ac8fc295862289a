// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shocker value type.

/// A single controllable unit attached to a hub.
///
/// Shockers are immutable values identified by [`id`](Self::id). The owning
/// hub is referenced by id only; resolve it through
/// [`OpenShock::hub_of`](crate::OpenShock::hub_of).
///
/// # Examples
///
/// ```
/// use openshock_lib::Shocker;
///
/// let shocker = Shocker::new("s1", "Collar", 1234, "CaiXianlin", false, Some("g1".into()));
/// assert_eq!(shocker.id(), "s1");
/// assert_eq!(shocker.hub_id(), Some("g1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shocker {
    id: String,
    name: String,
    rf_id: i64,
    model: String,
    paused: bool,
    hub_id: Option<String>,
}

impl Shocker {
    /// Creates a shocker value.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rf_id: i64,
        model: impl Into<String>,
        paused: bool,
        hub_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rf_id,
            model: model.into(),
            paused,
            hub_id,
        }
    }

    /// Returns the shocker id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the radio id used by the hub to address this shocker.
    #[must_use]
    pub fn rf_id(&self) -> i64 {
        self.rf_id
    }

    /// Returns the hardware model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns `true` if the shocker is paused server-side.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns the id of the owning hub, if known.
    #[must_use]
    pub fn hub_id(&self) -> Option<&str> {
        self.hub_id.as_deref()
    }
}
