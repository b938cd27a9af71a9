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

//! Listener and connector endpoints
//!
//! Both are shared between the registry and the transport behind an `Arc`, so
//! state is atomic and the small amount of mutable transport data sits behind
//! short-lived locks that are never held across a call into the transport.

use crate::server_config::ServerConfig;
use crate::transport::BoundListener;
use crate::types::{ConnectionId, EndpointId, EndpointState};
use crate::worker::{ConnectionHandle, ControlMessage};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An inbound endpoint
pub struct Listener {
    id: EndpointId,
    config: Arc<ServerConfig>,
    state: AtomicU8,
    exit_on_error: AtomicBool,
    bound: Mutex<Option<Box<dyn BoundListener>>>,
}

impl Listener {
    pub(crate) fn new(id: EndpointId, config: ServerConfig) -> Self {
        Self {
            id,
            config: Arc::new(config),
            state: AtomicU8::new(EndpointState::Configured.as_u8()),
            exit_on_error: AtomicBool::new(false),
            bound: Mutex::new(None),
        }
    }

    /// Listener identity
    pub fn id(&self) -> EndpointId {
        self.id
    }

    /// Resolved configuration
    pub fn config(&self) -> &Arc<ServerConfig> {
        &self.config
    }

    /// Administrative name, if one was configured
    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    /// Current lifecycle state
    pub fn state(&self) -> EndpointState {
        EndpointState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: EndpointState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Whether a bind failure on this listener terminates the process
    ///
    /// Set only for listeners started by the first start pass.
    pub fn exit_on_error(&self) -> bool {
        self.exit_on_error.load(Ordering::Acquire)
    }

    pub(crate) fn set_exit_on_error(&self, exit_on_error: bool) {
        self.exit_on_error.store(exit_on_error, Ordering::Release);
    }

    /// Check if the transport holds a bound endpoint for this listener
    pub fn is_bound(&self) -> bool {
        lock(&self.bound).is_some()
    }

    pub(crate) fn attach_bound(&self, bound: Box<dyn BoundListener>) {
        let previous = lock(&self.bound).replace(bound);
        if let Some(previous) = previous {
            previous.close();
        }
    }

    /// Close the bound endpoint, returning whether there was one
    pub(crate) fn close_bound(&self) -> bool {
        let bound = lock(&self.bound).take();
        match bound {
            Some(bound) => {
                bound.close();
                true
            }
            None => false,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let bound = self
            .bound
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(bound) = bound {
            trace!(listener_id = %self.id, "Closing bound listener on release");
            bound.close();
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("host_port", &self.config.host_port)
            .field("state", &self.state())
            .field("bound", &self.is_bound())
            .field("exit_on_error", &self.exit_on_error())
            .finish()
    }
}

/// An outbound endpoint
///
/// Holds at most one live connection. The connection slot and the state share
/// one lock so that attaching a new connection and deleting the connector are
/// strictly ordered.
pub struct Connector {
    id: EndpointId,
    config: Arc<ServerConfig>,
    state: AtomicU8,
    connection: Mutex<Option<ConnectionHandle>>,
}

impl Connector {
    pub(crate) fn new(id: EndpointId, config: ServerConfig) -> Self {
        Self {
            id,
            config: Arc::new(config),
            state: AtomicU8::new(EndpointState::Configured.as_u8()),
            connection: Mutex::new(None),
        }
    }

    /// Connector identity
    pub fn id(&self) -> EndpointId {
        self.id
    }

    /// Resolved configuration
    pub fn config(&self) -> &Arc<ServerConfig> {
        &self.config
    }

    /// Administrative name, if one was configured
    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    /// Current lifecycle state
    pub fn state(&self) -> EndpointState {
        EndpointState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: EndpointState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Record the connection the transport established for this connector
    ///
    /// Refused once the connector is being deleted; the handle is returned so
    /// the transport can close the connection itself.
    pub fn attach_connection(&self, handle: ConnectionHandle) -> Result<(), ConnectionHandle> {
        let mut slot = lock(&self.connection);
        if self.state().is_terminal() {
            return Err(handle);
        }
        trace!(connector_id = %self.id, connection_id = %handle.id(), "Connection attached");
        *slot = Some(handle);
        self.set_state(EndpointState::Active);
        Ok(())
    }

    /// Forget the connection once the transport has torn it down
    ///
    /// Ignored if a different connection has since been attached.
    pub fn detach_connection(&self, id: ConnectionId) -> Option<ConnectionHandle> {
        let mut slot = lock(&self.connection);
        if slot.as_ref().map(ConnectionHandle::id) != Some(id) {
            return None;
        }
        let detached = slot.take();
        if !self.state().is_terminal() {
            self.set_state(EndpointState::Starting);
        }
        detached
    }

    /// Identity of the live connection, if any
    pub fn connection_id(&self) -> Option<ConnectionId> {
        lock(&self.connection).as_ref().map(ConnectionHandle::id)
    }

    /// Check if a live connection is attached
    pub fn has_connection(&self) -> bool {
        lock(&self.connection)
            .as_ref()
            .is_some_and(|handle| !handle.is_torn_down())
    }

    /// Mark the connector as closing and queue a close for its live connection
    ///
    /// The close is handed to the connection's own context and never executed
    /// here. Returns the connection the close was queued for.
    pub(crate) fn request_close(&self) -> Option<ConnectionId> {
        let slot = lock(&self.connection);
        self.set_state(EndpointState::Closing);
        match slot.as_ref() {
            Some(handle) if handle.defer(ControlMessage::Close) => Some(handle.id()),
            _ => None,
        }
    }
}

impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("host_port", &self.config.host_port)
            .field("state", &self.state())
            .field("connection", &self.connection_id())
            .finish()
    }
}
