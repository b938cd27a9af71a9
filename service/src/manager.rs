//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Connection manager implementation
//!
//! The ConnectionManager is responsible for:
//! - Holding the configured listeners, connectors and SSL profiles
//! - Resolving administrative entities into endpoint configuration
//! - Handing out insertion-ordered snapshots for the start pass
//! - Detaching endpoints on deletion and shutdown

use crate::config::ManagerConfig;
use crate::endpoint::{Connector, Listener};
use crate::failover::FailoverList;
use crate::profile::{SslProfile, SslProfileRegistry};
use crate::resolver::ConfigResolver;
use crate::server_config::ServerConfig;
use crate::types::{EndpointId, EndpointState, ProfileId};
use crate::{ManagerError, Result};
use dashmap::DashMap;
use metrics::gauge;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use switchyard_entity::Entity;
use tracing::{error, info, instrument};

/// Registry of listeners, connectors and SSL profiles
///
/// Identities come from one monotonic counter shared by listeners and
/// connectors, so sorting by identity yields insertion order.
pub struct ConnectionManager {
    config: ManagerConfig,
    listeners: DashMap<EndpointId, Arc<Listener>>,
    connectors: DashMap<EndpointId, Arc<Connector>>,
    profiles: SslProfileRegistry,
    next_id: AtomicU64,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

impl ConnectionManager {
    /// Create an empty manager
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            listeners: DashMap::new(),
            connectors: DashMap::new(),
            profiles: SslProfileRegistry::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create an empty manager after validating its configuration
    pub fn try_new(config: ManagerConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|reason| ManagerError::invalid("managerConfig", reason))?;
        Ok(Self::new(config))
    }

    /// Manager configuration
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    fn next_endpoint_id(&self) -> EndpointId {
        EndpointId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn resolver(&self) -> ConfigResolver<'_> {
        ConfigResolver::new(&self.config, &self.profiles)
    }

    fn resolve_listener(&self, entity: &Entity) -> Result<ServerConfig> {
        let mut config = self.resolver().resolve(entity)?;
        if let Some(text) = entity.opt_string("failoverList", None)? {
            config.failover_list = Some(FailoverList::parse(&text)?);
        }
        Ok(config)
    }

    fn update_gauges(&self) {
        gauge!("switchyard.listeners.configured").set(self.listeners.len() as f64);
        gauge!("switchyard.connectors.configured").set(self.connectors.len() as f64);
    }

    // ---- SSL profiles ------------------------------------------------------

    /// Create an SSL profile
    pub fn configure_ssl_profile(&self, entity: &Entity) -> Result<Arc<SslProfile>> {
        self.profiles.create(entity)
    }

    /// Find an SSL profile by exact name
    pub fn find_ssl_profile(&self, name: &str) -> Option<Arc<SslProfile>> {
        self.profiles.find(name)
    }

    /// Delete an SSL profile
    ///
    /// Endpoints configured from the profile keep their copied credentials.
    pub fn delete_ssl_profile(&self, id: ProfileId) -> Result<()> {
        self.profiles
            .delete(id)
            .map(|_| ())
            .ok_or(ManagerError::ProfileNotFound(id))
    }

    /// The SSL profile registry
    pub fn ssl_profiles(&self) -> &SslProfileRegistry {
        &self.profiles
    }

    // ---- Endpoints ---------------------------------------------------------

    /// Create a listener from its administrative attributes
    ///
    /// Nothing is bound until the next start pass.
    #[instrument(skip_all)]
    pub fn configure_listener(&self, entity: &Entity) -> Result<Arc<Listener>> {
        let config = match self.resolve_listener(entity) {
            Ok(config) => config,
            Err(e) => {
                error!("Unable to create listener: {}", e);
                return Err(e);
            }
        };

        let listener = Arc::new(Listener::new(self.next_endpoint_id(), config));
        self.listeners.insert(listener.id(), listener.clone());
        self.update_gauges();

        info!(
            listener_id = %listener.id(),
            "Configured Listener: {}",
            listener.config().summary()
        );
        Ok(listener)
    }

    /// Create a connector from its administrative attributes
    ///
    /// No connection is attempted until the next start pass.
    #[instrument(skip_all)]
    pub fn configure_connector(&self, entity: &Entity) -> Result<Arc<Connector>> {
        let config = match self.resolver().resolve(entity) {
            Ok(config) => config,
            Err(e) => {
                error!("Unable to create connector: {}", e);
                return Err(e);
            }
        };

        let connector = Arc::new(Connector::new(self.next_endpoint_id(), config));
        self.connectors.insert(connector.id(), connector.clone());
        self.update_gauges();

        info!(
            connector_id = %connector.id(),
            "Configured Connector: {}",
            connector.config().summary()
        );
        Ok(connector)
    }

    /// All listeners in creation order
    pub fn listeners(&self) -> Vec<Arc<Listener>> {
        let mut listeners: Vec<_> = self
            .listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        listeners.sort_by_key(|listener| listener.id());
        listeners
    }

    /// All connectors in creation order
    pub fn connectors(&self) -> Vec<Arc<Connector>> {
        let mut connectors: Vec<_> = self
            .connectors
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        connectors.sort_by_key(|connector| connector.id());
        connectors
    }

    /// Look up a listener
    pub fn find_listener(&self, id: EndpointId) -> Option<Arc<Listener>> {
        self.listeners.get(&id).map(|entry| entry.value().clone())
    }

    /// Look up a connector
    pub fn find_connector(&self, id: EndpointId) -> Option<Arc<Connector>> {
        self.connectors.get(&id).map(|entry| entry.value().clone())
    }

    /// Name of a connector, if it exists and has one
    pub fn connector_name(&self, id: EndpointId) -> Option<String> {
        self.connectors
            .get(&id)
            .and_then(|entry| entry.value().name().map(str::to_string))
    }

    /// Detach a listener from the registry
    ///
    /// The listener is released once the transport drops its own reference.
    pub fn remove_listener(&self, id: EndpointId) -> Option<Arc<Listener>> {
        let removed = self.listeners.remove(&id).map(|(_, listener)| listener);
        if removed.is_some() {
            self.update_gauges();
        }
        removed
    }

    /// Detach a connector from the registry
    pub fn remove_connector(&self, id: EndpointId) -> Option<Arc<Connector>> {
        let removed = self.connectors.remove(&id).map(|(_, connector)| connector);
        if removed.is_some() {
            self.update_gauges();
        }
        removed
    }

    /// Number of configured listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of configured connectors
    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Release every endpoint and profile
    ///
    /// Bound listeners are closed and live connector connections get a
    /// deferred close.
    pub fn shutdown(&self) {
        for listener in self.listeners() {
            self.listeners.remove(&listener.id());
            listener.close_bound();
            listener.set_state(EndpointState::Closed);
        }
        for connector in self.connectors() {
            self.connectors.remove(&connector.id());
            connector.request_close();
            connector.set_state(EndpointState::Closed);
        }
        self.profiles.clear();
        self.update_gauges();
        info!("Connection manager shut down");
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("listener_count", &self.listener_count())
            .field("connector_count", &self.connector_count())
            .field("ssl_profiles", &self.profiles)
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn listener_entity(port: &str) -> Entity {
        Entity::new()
            .with("host", "0.0.0.0")
            .with("port", port)
            .with("role", "normal")
            .with("maxFrameSize", 16384)
            .with("maxSessions", 100)
            .with("idleTimeoutSeconds", 16)
    }

    #[test]
    fn test_snapshots_follow_insertion_order() {
        let manager = ConnectionManager::default();
        let l1 = manager.configure_listener(&listener_entity("5672")).unwrap();
        let c1 = manager.configure_connector(&listener_entity("5673")).unwrap();
        let l2 = manager.configure_listener(&listener_entity("5674")).unwrap();

        let listeners: Vec<_> = manager.listeners().iter().map(|l| l.id()).collect();
        assert_eq!(listeners, vec![l1.id(), l2.id()]);
        assert_eq!(manager.connectors()[0].id(), c1.id());
        assert!(l1.id() < c1.id() && c1.id() < l2.id());
    }

    #[test]
    fn test_failover_list_applies_to_listeners() {
        let manager = ConnectionManager::default();
        let entity = listener_entity("5672").with("failoverList", "amqps://backup:5671, other");
        let listener = manager.configure_listener(&entity).unwrap();

        let failover = listener.config().failover_list.as_ref().unwrap();
        assert_eq!(failover.len(), 2);
        assert_eq!(failover.entries()[1].to_string(), "amqp://other:5672");

        let connector = manager.configure_connector(&entity).unwrap();
        assert!(connector.config().failover_list.is_none());
    }

    #[test]
    #[traced_test]
    fn test_bad_listener_is_rejected_and_logged() {
        let manager = ConnectionManager::default();
        let entity = listener_entity("5672").with("failoverList", " , ");

        let err = manager.configure_listener(&entity).unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(manager.listener_count(), 0);
        assert!(logs_contain("Unable to create listener"));
    }

    #[test]
    #[traced_test]
    fn test_configured_listener_is_logged() {
        let manager = ConnectionManager::default();
        manager.configure_listener(&listener_entity("5672")).unwrap();
        assert!(logs_contain("Configured Listener: 0.0.0.0:5672 proto=any, role=normal"));
    }

    #[test]
    fn test_connector_name() {
        let manager = ConnectionManager::default();
        let named = manager
            .configure_connector(&listener_entity("5672").with("name", "uplink"))
            .unwrap();
        let anonymous = manager.configure_connector(&listener_entity("5673")).unwrap();

        assert_eq!(manager.connector_name(named.id()).as_deref(), Some("uplink"));
        assert_eq!(manager.connector_name(anonymous.id()), None);
        assert_eq!(manager.connector_name(EndpointId::new(999)), None);
    }

    #[test]
    fn test_try_new_validates_config() {
        let config = ManagerConfig::default().with_default_link_capacity(0);
        let err = ConnectionManager::try_new(config).unwrap_err();
        assert!(err.is_validation_error());
        assert!(ConnectionManager::try_new(ManagerConfig::default()).is_ok());
    }

    #[test]
    fn test_delete_missing_profile() {
        let manager = ConnectionManager::default();
        let err = manager.delete_ssl_profile(ProfileId::new(7)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_shutdown_empties_registry() {
        let manager = ConnectionManager::default();
        let listener = manager.configure_listener(&listener_entity("5672")).unwrap();
        manager.configure_connector(&listener_entity("5673")).unwrap();
        manager
            .configure_ssl_profile(&Entity::new().with("name", "tls"))
            .unwrap();

        manager.shutdown();

        assert_eq!(manager.listener_count(), 0);
        assert_eq!(manager.connector_count(), 0);
        assert!(manager.find_ssl_profile("tls").is_none());
        assert_eq!(listener.state(), EndpointState::Closed);
    }
}
