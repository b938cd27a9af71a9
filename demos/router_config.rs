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

//! Router configuration walkthrough
//!
//! Configures an SSL profile, two listeners and a connector against an
//! in-memory transport, runs a start pass, then deletes the connector while it
//! holds a live connection.
//!
//! Run with `RUST_LOG=debug cargo run --example router_config` for more detail.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use switchyard_entity::Entity;
use switchyard_service::{
    BoundListener, ConnectionId, ConnectionManager, ConnectionWorker, Connector,
    LifecycleController, Listener, ManagerConfig, Transport, TransportConnection, TransportError,
};
use tracing::info;

struct MemoryListener {
    host_port: String,
}

impl BoundListener for MemoryListener {
    fn close(&self) {
        info!("Stopped listening on {}", self.host_port);
    }
}

struct MemoryConnection {
    id: ConnectionId,
}

impl TransportConnection for MemoryConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn close(&self) {
        info!("Connection {} closed", self.id);
    }
}

/// Transport that "binds" instantly and connects every connector immediately
#[derive(Default)]
struct MemoryTransport {
    next_connection: AtomicU64,
}

impl Transport for MemoryTransport {
    fn listen(&self, listener: &Arc<Listener>) -> Result<Box<dyn BoundListener>, TransportError> {
        info!("Listening on {}", listener.config().host_port);
        Ok(Box::new(MemoryListener {
            host_port: listener.config().host_port.clone(),
        }))
    }

    fn connect(&self, connector: &Arc<Connector>) {
        let id = ConnectionId::new(self.next_connection.fetch_add(1, Ordering::SeqCst) + 1);
        let (worker, handle) = ConnectionWorker::new(Arc::new(MemoryConnection { id }));
        match connector.attach_connection(handle) {
            Ok(()) => {
                info!("Connected to {} as {}", connector.config().host_port, id);
                tokio::spawn(worker.run());
            }
            Err(handle) => handle.teardown(),
        }
    }
}

fn endpoint(port: &str, role: &str) -> Entity {
    Entity::new()
        .with("port", port)
        .with("role", role)
        .with("maxFrameSize", 16384)
        .with("maxSessions", 32768)
        .with("idleTimeoutSeconds", 16)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let manager = Arc::new(ConnectionManager::try_new(ManagerConfig::default())?);

    manager.configure_ssl_profile(
        &Entity::new()
            .with("name", "router-tls")
            .with("certFile", "/etc/pki/router.crt")
            .with("keyFile", "/etc/pki/router.key")
            .with("password", "literal:changeit"),
    )?;

    manager.configure_listener(&endpoint("amqp", "normal").with("logMessage", "message-id,to"))?;
    manager.configure_listener(
        &endpoint("5671", "inter-router")
            .with("host", "0.0.0.0")
            .with("sslProfile", "router-tls")
            .with("maxSessionFrames", 1000)
            .with("failoverList", "amqps://backup.example.com:5671"),
    )?;
    let uplink = manager.configure_connector(
        &endpoint("5672", "edge")
            .with("name", "uplink")
            .with("host", "hub.example.com"),
    )?;

    let transport = Arc::new(MemoryTransport::default());
    let controller = LifecycleController::new(manager.clone(), transport);
    let report = controller.start_or_exit();
    info!(?report, "Start pass finished");

    info!(
        "Deleting connector {}",
        manager.connector_name(uplink.id()).unwrap_or_default()
    );
    controller.delete_connector(uplink.id())?;

    // Let the connection worker run its deferred close.
    tokio::task::yield_now().await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    for listener in manager.listeners() {
        controller.delete_listener(listener.id())?;
    }
    manager.shutdown();

    Ok(())
}
