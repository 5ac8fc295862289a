// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `OpenShock` API client.

use std::sync::Arc;
use std::time::Duration;

use crate::action::{ControlRequestAction, RestAction, fetch};
use crate::cache::DeviceCache;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::{ApiRequest, HttpTransport, RestResponse};
use crate::types::{ControlData, ControlType, DeviceHub, Shocker};

/// Client for the `OpenShock` device control API.
///
/// The client owns a [`DeviceCache`] that fetch actions fill as they decode.
/// Clones share the same cache and connection pool.
///
/// # Examples
///
/// ```no_run
/// use openshock_lib::{ClientConfig, OpenShock};
/// use std::time::Duration;
///
/// # async fn example() -> openshock_lib::Result<()> {
/// // Builds the client and caches every hub and shocker of the account
/// let client = OpenShock::connect(ClientConfig::new("my-token")).await?;
///
/// if let Some(shocker) = client.cached_shocker("5f6a...") {
///     client.vibrate(&shocker, 30, Duration::from_secs(1))?.execute().await?;
///     client.stop(&shocker)?.execute().await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenShock {
    transport: HttpTransport,
    cache: Arc<DeviceCache>,
}

impl OpenShock {
    /// Creates a client with an empty cache. No request is made.
    ///
    /// # Errors
    ///
    /// Returns error if the API host or token is invalid, or the HTTP client
    /// cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_cache(config, Arc::new(DeviceCache::new()))
    }

    /// Creates a client around an existing cache.
    ///
    /// # Errors
    ///
    /// Returns error if the API host or token is invalid, or the HTTP client
    /// cannot be created.
    pub fn with_cache(config: ClientConfig, cache: Arc<DeviceCache>) -> Result<Self> {
        let transport = HttpTransport::new(Arc::new(config))?;
        Ok(Self { transport, cache })
    }

    /// Creates a client and synchronizes the hub/shocker topology.
    ///
    /// A rejected listing (bad token, server error) is logged and leaves the
    /// cache empty; the client is still returned.
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be created or the initial fetch
    /// fails at the transport level.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        let hubs = client.retrieve_all_shockers().execute().await?;
        tracing::info!(hubs = hubs.len(), "Connected to OpenShock API");
        Ok(client)
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Returns the shared device cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<DeviceCache> {
        &self.cache
    }

    // =========================================================================
    // Generic actions
    // =========================================================================

    /// Builds an action for an arbitrary request with a custom decoder.
    pub fn action<T, D>(&self, request: ApiRequest, decoder: D) -> RestAction<T>
    where
        D: FnOnce(RestResponse) -> Result<T> + Send + 'static,
    {
        RestAction::new(self.transport.clone(), request, decoder)
    }

    /// Builds an action for an arbitrary request that only checks for
    /// status 200.
    pub fn request(&self, request: ApiRequest) -> RestAction<()> {
        RestAction::expect_ok(self.transport.clone(), request)
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// Fetches every hub and shocker of the account and caches them.
    ///
    /// Meant to run once at startup; run it again to resynchronize.
    pub fn retrieve_all_shockers(&self) -> RestAction<Vec<DeviceHub>> {
        fetch::retrieve_all(&self.transport, Arc::clone(&self.cache))
    }

    /// Fetches a shocker from the API, bypassing the cache, and caches it.
    pub fn retrieve_shocker(&self, id: &str) -> RestAction<Option<Shocker>> {
        fetch::retrieve_one(&self.transport, Arc::clone(&self.cache), id)
    }

    /// Returns a shocker from the cache, or fetches it if it is not cached.
    pub fn get_shocker(&self, id: &str) -> RestAction<Option<Shocker>> {
        match self.cache.lookup_shocker(id) {
            Some(shocker) => RestAction::completed(Some(shocker)),
            None => self.retrieve_shocker(id),
        }
    }

    /// Returns a cached shocker. Never touches the network.
    #[must_use]
    pub fn cached_shocker(&self, id: &str) -> Option<Shocker> {
        self.cache.lookup_shocker(id)
    }

    /// Returns every cached shocker.
    #[must_use]
    pub fn cached_shockers(&self) -> Vec<Shocker> {
        self.cache.shockers()
    }

    /// Returns a cached hub. Hubs are only known after a topology fetch.
    #[must_use]
    pub fn hub(&self, id: &str) -> Option<DeviceHub> {
        self.cache.lookup_hub(id)
    }

    /// Returns every cached hub.
    #[must_use]
    pub fn hubs(&self) -> Vec<DeviceHub> {
        self.cache.hubs()
    }

    /// Resolves the hub a shocker belongs to.
    #[must_use]
    pub fn hub_of(&self, shocker: &Shocker) -> Option<DeviceHub> {
        shocker.hub_id().and_then(|id| self.cache.lookup_hub(id))
    }

    /// Caches a hub with its shockers. Does not create anything server-side.
    pub fn register_hub(&self, hub: DeviceHub, shockers: Vec<Shocker>) -> DeviceHub {
        self.cache.register_hub(hub, shockers)
    }

    /// Caches a shocker under its hub. Does not create anything server-side.
    pub fn register_shocker(&self, shocker: Shocker) {
        self.cache.register_shocker(shocker);
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Starts an empty control batch.
    pub fn control(&self) -> ControlRequestAction {
        ControlRequestAction::new(self.transport.clone())
    }

    /// Prepares a single command for one shocker.
    ///
    /// The returned batch can take more commands before it is sent.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if intensity or duration is out of range.
    pub fn prepare_control(
        &self,
        shocker: &Shocker,
        data: ControlData,
    ) -> Result<ControlRequestAction> {
        Ok(self.control().add(shocker, data)?)
    }

    /// Prepares a shock.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if intensity exceeds 100 or duration exceeds
    /// 30 seconds.
    pub fn shock(
        &self,
        shocker: &Shocker,
        intensity: u8,
        duration: Duration,
    ) -> Result<ControlRequestAction> {
        let data = ControlData::with_duration(ControlType::Shock, intensity, duration);
        self.prepare_control(shocker, data)
    }

    /// Prepares a vibration.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if intensity exceeds 100 or duration exceeds
    /// 30 seconds.
    pub fn vibrate(
        &self,
        shocker: &Shocker,
        intensity: u8,
        duration: Duration,
    ) -> Result<ControlRequestAction> {
        let data = ControlData::with_duration(ControlType::Vibrate, intensity, duration);
        self.prepare_control(shocker, data)
    }

    /// Prepares a beep. Sound is sent with intensity 0.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if duration exceeds 30 seconds.
    pub fn sound(&self, shocker: &Shocker, duration: Duration) -> Result<ControlRequestAction> {
        let data = ControlData::with_duration(ControlType::Sound, 0, duration);
        self.prepare_control(shocker, data)
    }

    /// Prepares a stop, cancelling whatever the shocker is doing.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other controls.
    pub fn stop(&self, shocker: &Shocker) -> Result<ControlRequestAction> {
        self.prepare_control(shocker, ControlData::stop())
    }
}
