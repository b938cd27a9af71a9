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

//! Endpoint lifecycle control
//!
//! Start passes bring every configured endpoint up through the transport;
//! targeted deletion tears a single endpoint down. Endpoints move through
//! `Configured -> Starting -> Active -> Closing -> Closed`.

use crate::manager::ConnectionManager;
use crate::transport::Transport;
use crate::types::{EndpointId, EndpointState};
use crate::{ManagerError, Result};
use metrics::counter;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one start pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartReport {
    /// Whether this was the first start pass
    pub first_pass: bool,
    /// Listeners whose bind request was accepted
    pub listeners_started: usize,
    /// Listeners skipped because they were already bound
    pub listeners_already_bound: usize,
    /// Listeners whose bind request failed (identity and reason)
    pub listener_failures: Vec<(EndpointId, String)>,
    /// Connectors a connect attempt was requested for
    pub connectors_started: usize,
}

impl StartReport {
    /// Check if every listener is bound or was asked to bind
    pub fn all_started(&self) -> bool {
        self.listener_failures.is_empty()
    }
}

/// Drives start passes and targeted deletion against a [`ConnectionManager`]
pub struct LifecycleController {
    manager: Arc<ConnectionManager>,
    transport: Arc<dyn Transport>,
    first_start: AtomicBool,
}

impl LifecycleController {
    /// Create a controller; its first [`start`](Self::start) is the first pass
    pub fn new(manager: Arc<ConnectionManager>, transport: Arc<dyn Transport>) -> Self {
        Self {
            manager,
            transport,
            first_start: AtomicBool::new(true),
        }
    }

    /// The managed registry
    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    /// Check if no start pass has completed yet
    pub fn is_first_start(&self) -> bool {
        self.first_start.load(Ordering::Acquire)
    }

    /// Run a start pass
    ///
    /// Listeners are started before connectors, each in creation order.
    /// Listeners that are already bound are left alone. A bind failure during
    /// the first pass aborts the pass with [`ManagerError::InitialBindFailed`]
    /// and leaves the first-pass flag set; on later passes it is logged and the
    /// pass continues.
    #[instrument(skip(self), fields(first_pass = self.is_first_start()))]
    pub fn start(&self) -> Result<StartReport> {
        let first_pass = self.is_first_start();
        let mut report = StartReport {
            first_pass,
            ..StartReport::default()
        };

        for listener in self.manager.listeners() {
            if listener.is_bound() {
                report.listeners_already_bound += 1;
                continue;
            }

            listener.set_state(EndpointState::Starting);
            match self.transport.listen(&listener) {
                Ok(bound) => {
                    listener.attach_bound(bound);
                    listener.set_exit_on_error(first_pass);
                    listener.set_state(EndpointState::Active);
                    report.listeners_started += 1;
                    debug!(listener_id = %listener.id(), "Listening on {}", listener.config().host_port);
                }
                Err(e) if first_pass => {
                    listener.set_state(EndpointState::Configured);
                    counter!("switchyard.listeners.bind_failures").increment(1);
                    return Err(ManagerError::InitialBindFailed {
                        host_port: listener.config().host_port.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    listener.set_state(EndpointState::Configured);
                    listener.set_exit_on_error(false);
                    counter!("switchyard.listeners.bind_failures").increment(1);
                    error!(
                        listener_id = %listener.id(),
                        "Listen on {} failed: {}",
                        listener.config().host_port,
                        e
                    );
                    report.listener_failures.push((listener.id(), e.to_string()));
                }
            }
        }

        for connector in self.manager.connectors() {
            if !connector.has_connection() {
                connector.set_state(EndpointState::Starting);
            }
            self.transport.connect(&connector);
            counter!("switchyard.connectors.connect_requests").increment(1);
            report.connectors_started += 1;
        }

        self.first_start.store(false, Ordering::Release);
        info!(
            listeners = report.listeners_started,
            connectors = report.connectors_started,
            failures = report.listener_failures.len(),
            "Start pass complete"
        );
        Ok(report)
    }

    /// Run a start pass, terminating the process on a fatal failure
    ///
    /// The exit code comes from [`ManagerConfig::fatal_exit_code`](crate::ManagerConfig).
    pub fn start_or_exit(&self) -> StartReport {
        match self.start() {
            Ok(report) => report,
            Err(e) => {
                error!("{}", e);
                std::process::exit(self.manager.config().fatal_exit_code)
            }
        }
    }

    /// Delete a listener
    ///
    /// The bound transport endpoint is closed before the listener leaves the
    /// registry.
    #[instrument(skip(self))]
    pub fn delete_listener(&self, id: EndpointId) -> Result<()> {
        let listener = self
            .manager
            .find_listener(id)
            .ok_or(ManagerError::EndpointNotFound(id))?;

        listener.set_state(EndpointState::Closing);
        if listener.close_bound() {
            debug!("Closed listener on {}", listener.config().host_port);
        }
        self.manager.remove_listener(id);
        listener.set_state(EndpointState::Closed);

        info!("Deleted Listener for {}", listener.config().host_port);
        Ok(())
    }

    /// Delete a connector
    ///
    /// A live connection is closed through a deferred close queued to the
    /// connection's own context; it is never closed from here.
    #[instrument(skip(self))]
    pub fn delete_connector(&self, id: EndpointId) -> Result<()> {
        let connector = self
            .manager
            .find_connector(id)
            .ok_or(ManagerError::EndpointNotFound(id))?;

        if let Some(connection_id) = connector.request_close() {
            debug!(%connection_id, "Deferred close of live connection");
        } else if connector.connection_id().is_some() {
            warn!("Connection already torn down, nothing to close");
        }
        self.manager.remove_connector(id);
        connector.set_state(EndpointState::Closed);

        info!("Deleted Connector for {}", connector.config().host_port);
        Ok(())
    }
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("manager", &self.manager)
            .field("first_start", &self.is_first_start())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{Connector, Listener};
    use crate::error::TransportError;
    use crate::transport::BoundListener;
    use std::sync::Mutex;
    use switchyard_entity::Entity;
    use tracing_test::traced_test;

    struct RefusingTransport {
        refuse: Mutex<bool>,
    }

    struct Bound;

    impl BoundListener for Bound {
        fn close(&self) {}
    }

    impl Transport for RefusingTransport {
        fn listen(
            &self,
            listener: &Arc<Listener>,
        ) -> std::result::Result<Box<dyn BoundListener>, TransportError> {
            if *self.refuse.lock().unwrap() {
                Err(TransportError::Bind {
                    host_port: listener.config().host_port.clone(),
                    reason: "address in use".to_string(),
                })
            } else {
                Ok(Box::new(Bound))
            }
        }

        fn connect(&self, _connector: &Arc<Connector>) {}
    }

    fn setup(refuse: bool) -> (LifecycleController, Arc<RefusingTransport>) {
        let manager = Arc::new(ConnectionManager::default());
        manager
            .configure_listener(
                &Entity::new()
                    .with("host", "10.0.0.1")
                    .with("port", "5672")
                    .with("role", "normal")
                    .with("maxFrameSize", 16384)
                    .with("maxSessions", 10)
                    .with("idleTimeoutSeconds", 16),
            )
            .unwrap();
        let transport = Arc::new(RefusingTransport {
            refuse: Mutex::new(refuse),
        });
        (LifecycleController::new(manager, transport.clone()), transport)
    }

    #[test]
    fn test_initial_bind_failure_is_fatal() {
        let (controller, _transport) = setup(true);
        let err = controller.start().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("10.0.0.1:5672"));
        assert!(controller.is_first_start());
    }

    #[test]
    #[traced_test]
    fn test_later_bind_failure_is_logged() {
        let (controller, transport) = setup(false);
        let first = controller.start().unwrap();
        assert!(first.first_pass);
        assert!(!controller.is_first_start());

        let listener = controller.manager().listeners()[0].clone();
        assert!(listener.exit_on_error());
        controller.delete_listener(listener.id()).unwrap();

        let entity = Entity::new()
            .with("port", "5673")
            .with("role", "normal")
            .with("maxFrameSize", 16384)
            .with("maxSessions", 10)
            .with("idleTimeoutSeconds", 16);
        controller.manager().configure_listener(&entity).unwrap();
        *transport.refuse.lock().unwrap() = true;

        let second = controller.start().unwrap();
        assert!(!second.first_pass);
        assert_eq!(second.listener_failures.len(), 1);
        assert!(!controller.manager().listeners()[0].exit_on_error());
        assert!(logs_contain("Listen on 127.0.0.1:5673 failed"));
    }
}
