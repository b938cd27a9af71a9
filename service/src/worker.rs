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

//! Connection worker implementation
//!
//! Every live connection has exactly one execution context that is allowed to
//! act on it. Other contexts, such as the administrative context deleting a
//! connector, never call into the connection directly; they queue a
//! [`ControlMessage`] through a [`ConnectionHandle`] and the
//! [`ConnectionWorker`] running in the owning context executes it.
//!
//! Messages still queued when the connection tears down on its own are
//! delivered with `discard = true` and do nothing.

use crate::transport::TransportConnection;
use crate::types::ConnectionId;
use metrics::counter;
use std::sync::Arc;
use tokio::select;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Deferred actions executed in a connection's own context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Close the connection
    Close,
}

impl ControlMessage {
    /// Execute the action against the connection
    ///
    /// When `discard` is set the action was overtaken by the connection's own
    /// teardown and must not touch it. Returns whether the action took effect.
    pub fn invoke(self, connection: &dyn TransportConnection, discard: bool) -> bool {
        if discard {
            trace!(connection_id = %connection.id(), action = ?self, "Discarding deferred action");
            return false;
        }
        match self {
            ControlMessage::Close => {
                debug!(connection_id = %connection.id(), "Running deferred close");
                counter!("switchyard.deferred.close").increment(1);
                connection.close();
            }
        }
        true
    }
}

/// Sending side of a connection's control channel
///
/// Cheap to clone; connectors keep one to reach their live connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    control_tx: mpsc::UnboundedSender<ControlMessage>,
    teardown: CancellationToken,
}

impl ConnectionHandle {
    /// Identity of the connection
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue an action for the connection's own context
    ///
    /// Never blocks. Returns false if the worker is gone.
    pub fn defer(&self, message: ControlMessage) -> bool {
        self.control_tx.send(message).is_ok()
    }

    /// Signal that the connection finished tearing down on its own
    ///
    /// Pending and future deferred actions are discarded.
    pub fn teardown(&self) {
        self.teardown.cancel();
    }

    /// Check if the connection has torn down
    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_cancelled() || self.control_tx.is_closed()
    }
}

/// Executes deferred actions in a connection's owning context
pub struct ConnectionWorker {
    connection: Arc<dyn TransportConnection>,
    control_rx: mpsc::UnboundedReceiver<ControlMessage>,
    teardown: CancellationToken,
}

impl ConnectionWorker {
    /// Create a worker for a connection, returning the handle other contexts use
    pub fn new(connection: Arc<dyn TransportConnection>) -> (Self, ConnectionHandle) {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let teardown = CancellationToken::new();

        let handle = ConnectionHandle {
            id: connection.id(),
            control_tx,
            teardown: teardown.clone(),
        };
        let worker = Self {
            connection,
            control_rx,
            teardown,
        };

        (worker, handle)
    }

    /// Identity of the connection
    pub fn id(&self) -> ConnectionId {
        self.connection.id()
    }

    /// Execute every queued action without waiting for more
    ///
    /// Intended for transports that poll from their own event loop. Once the
    /// connection has torn down the queue is discarded instead. Returns the
    /// number of actions that took effect.
    pub fn run_pending(&mut self) -> usize {
        if self.teardown.is_cancelled() {
            self.discard_pending();
            return 0;
        }

        let mut executed = 0;
        while let Ok(message) = self.control_rx.try_recv() {
            if message.invoke(self.connection.as_ref(), false) {
                executed += 1;
            }
        }
        executed
    }

    /// Close the control channel and discard whatever is still queued
    ///
    /// Returns the number of discarded actions.
    pub fn discard_pending(&mut self) -> usize {
        self.control_rx.close();
        let mut discarded = 0;
        while let Ok(message) = self.control_rx.try_recv() {
            message.invoke(self.connection.as_ref(), true);
            discarded += 1;
        }
        discarded
    }

    /// Run the worker until the connection closes or tears down
    pub async fn run(mut self) {
        loop {
            select! {
                biased;

                _ = self.teardown.cancelled() => break,

                message = self.control_rx.recv() => match message {
                    Some(message) => {
                        message.invoke(self.connection.as_ref(), false);
                        if message == ControlMessage::Close {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        let discarded = self.discard_pending();
        trace!(connection_id = %self.id(), discarded, "Connection worker finished");
    }
}

impl std::fmt::Debug for ConnectionWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionWorker")
            .field("id", &self.id())
            .field("torn_down", &self.teardown.is_cancelled())
            .finish()
    }
}
