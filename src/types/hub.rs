// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device hub type.

use crate::types::Shocker;

/// A gateway that relays commands to its attached shockers.
///
/// A hub never holds two shockers with the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHub {
    id: String,
    name: String,
    shockers: Vec<Shocker>,
}

impl DeviceHub {
    /// Creates a hub without shockers.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shockers: Vec::new(),
        }
    }

    /// Returns the hub id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attached shockers.
    #[must_use]
    pub fn shockers(&self) -> &[Shocker] {
        &self.shockers
    }

    /// Returns the attached shocker with the given id.
    #[must_use]
    pub fn shocker(&self, id: &str) -> Option<&Shocker> {
        self.shockers.iter().find(|s| s.id() == id)
    }

    /// Inserts a shocker, replacing any member with the same id in place.
    pub(crate) fn upsert(&mut self, shocker: Shocker) {
        match self.shockers.iter_mut().find(|s| s.id() == shocker.id()) {
            Some(existing) => *existing = shocker,
            None => self.shockers.push(shocker),
        }
    }

    /// Removes the shocker with the given id, returning it if present.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Shocker> {
        let index = self.shockers.iter().position(|s| s.id() == id)?;
        Some(self.shockers.remove(index))
    }
}
