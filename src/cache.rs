// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory registry of hubs and shockers.
//!
//! The cache is filled as a side effect of fetch actions and consulted by
//! lookups so repeated queries do not hit the API. Entries never expire; a
//! re-fetch of the same id replaces the previous entry in place.
//!
//! # Invariants
//!
//! - A shocker id appears at most once across the whole cache.
//! - A shocker whose hub is not cached yet is kept aside and moved into the
//!   hub as soon as that hub is registered.

use parking_lot::RwLock;

use crate::types::{DeviceHub, Shocker};

/// Thread-safe registry of hubs and their shockers.
///
/// Every mutation runs under a single write lock, so concurrent fetches
/// cannot lose each other's updates; the last writer for a given id wins.
///
/// # Examples
///
/// ```
/// use openshock_lib::{DeviceCache, DeviceHub, Shocker};
///
/// let cache = DeviceCache::new();
/// let shocker = Shocker::new("s1", "Collar", 123, "X", false, Some("g1".into()));
/// cache.register_hub(DeviceHub::new("g1", "Hub1"), vec![shocker]);
///
/// assert_eq!(cache.lookup_shocker("s1").unwrap().hub_id(), Some("g1"));
/// assert_eq!(cache.lookup_hub("g1").unwrap().shockers().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DeviceCache {
    inner: RwLock<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    hubs: Vec<DeviceHub>,
    /// Shockers whose hub has not been registered yet.
    orphans: Vec<Shocker>,
}

impl CacheInner {
    /// Removes `id` from every hub except `keep` and from the orphan list.
    fn detach(&mut self, id: &str, keep: Option<&str>) {
        for hub in &mut self.hubs {
            if Some(hub.id()) != keep {
                let _ = hub.remove(id);
            }
        }
        self.orphans.retain(|s| s.id() != id);
    }
}

impl DeviceCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hub together with its shockers and returns the stored hub.
    ///
    /// A cached hub with the same id is replaced in place. Shockers are
    /// de-duplicated by id (last one wins) and moved out of any other hub
    /// they were previously cached under. Pending shockers that declared
    /// this hub are adopted.
    pub fn register_hub(
        &self,
        mut hub: DeviceHub,
        shockers: impl IntoIterator<Item = Shocker>,
    ) -> DeviceHub {
        let mut inner = self.inner.write();

        let hub_id = hub.id().to_string();
        let (adopted, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut inner.orphans)
            .into_iter()
            .partition(|s| s.hub_id() == Some(hub_id.as_str()));
        inner.orphans = pending;

        for shocker in adopted.into_iter().chain(shockers) {
            hub.upsert(shocker);
        }
        for shocker in hub.shockers() {
            inner.detach(shocker.id(), Some(&hub_id));
        }

        tracing::debug!(hub = %hub_id, shockers = hub.shockers().len(), "Caching hub");

        match inner.hubs.iter_mut().find(|h| h.id() == hub_id) {
            Some(existing) => *existing = hub.clone(),
            None => inner.hubs.push(hub.clone()),
        }
        hub
    }

    /// Registers a single shocker under the hub named by its `hub_id`.
    ///
    /// Any cached shocker with the same id is replaced. If the hub is not
    /// cached, the shocker is kept aside until the hub is registered; it is
    /// still visible through [`lookup_shocker`](Self::lookup_shocker).
    pub fn register_shocker(&self, shocker: Shocker) {
        let mut inner = self.inner.write();

        let position = shocker
            .hub_id()
            .and_then(|id| inner.hubs.iter().position(|h| h.id() == id));
        let keep = position.and(shocker.hub_id());
        inner.detach(shocker.id(), keep);

        match position {
            Some(index) => {
                let hub = &mut inner.hubs[index];
                tracing::debug!(shocker = %shocker.id(), hub = %hub.id(), "Caching shocker");
                hub.upsert(shocker);
            }
            None => {
                tracing::debug!(
                    shocker = %shocker.id(),
                    hub = ?shocker.hub_id(),
                    "Caching shocker without a known hub"
                );
                inner.orphans.push(shocker);
            }
        }
    }

    /// Returns the cached hub with the given id.
    #[must_use]
    pub fn lookup_hub(&self, id: &str) -> Option<DeviceHub> {
        self.inner.read().hubs.iter().find(|h| h.id() == id).cloned()
    }

    /// Returns the cached shocker with the given id.
    #[must_use]
    pub fn lookup_shocker(&self, id: &str) -> Option<Shocker> {
        let inner = self.inner.read();
        inner
            .hubs
            .iter()
            .flat_map(DeviceHub::shockers)
            .chain(inner.orphans.iter())
            .find(|s| s.id() == id)
            .cloned()
    }

    /// Returns `true` if a shocker with the given id is cached.
    #[must_use]
    pub fn contains_shocker(&self, id: &str) -> bool {
        let inner = self.inner.read();
        inner
            .hubs
            .iter()
            .flat_map(DeviceHub::shockers)
            .chain(inner.orphans.iter())
            .any(|s| s.id() == id)
    }

    /// Returns a snapshot of all cached hubs in registration order.
    #[must_use]
    pub fn hubs(&self) -> Vec<DeviceHub> {
        self.inner.read().hubs.clone()
    }

    /// Returns a snapshot of every cached shocker, including those whose
    /// hub is not cached.
    #[must_use]
    pub fn shockers(&self) -> Vec<Shocker> {
        let inner = self.inner.read();
        inner
            .hubs
            .iter()
            .flat_map(DeviceHub::shockers)
            .chain(inner.orphans.iter())
            .cloned()
            .collect()
    }
}
