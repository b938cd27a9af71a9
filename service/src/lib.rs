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

//! Router Connection Management
//!
//! This crate turns administrative configuration records into listener and
//! connector definitions for a message router, keeps the TLS profiles they
//! reference, and controls when those endpoints are brought up and torn down.
//!
//! - Attribute resolution with defaulting, validation and overflow-safe
//!   session window derivation
//! - SSL profiles with `env:`, `literal:` and file based password sources
//! - A registry whose endpoints may be deleted while an I/O context still
//!   holds them
//! - Start passes and deletion, with connection closes deferred to the
//!   connection's own context
//!
//! # Architecture
//!
//! ```text
//! LifecycleController ──→ Transport
//!     ↓
//! ConnectionManager
//!     ↓                ↘
//! ConfigResolver      Listener / Connector ──→ ConnectionHandle ──→ ConnectionWorker
//!     ↓
//! SslProfileRegistry → PasswordSource
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use switchyard_entity::Entity;
//! use switchyard_service::{
//!     BoundListener, ConnectionManager, Connector, LifecycleController, Listener, ManagerConfig,
//!     Transport, TransportError,
//! };
//!
//! struct Bound;
//!
//! impl BoundListener for Bound {
//!     fn close(&self) {}
//! }
//!
//! struct LoopbackTransport;
//!
//! impl Transport for LoopbackTransport {
//!     fn listen(&self, _listener: &Arc<Listener>) -> Result<Box<dyn BoundListener>, TransportError> {
//!         Ok(Box::new(Bound))
//!     }
//!
//!     fn connect(&self, _connector: &Arc<Connector>) {}
//! }
//!
//! let manager = Arc::new(ConnectionManager::new(ManagerConfig::default()));
//! let listener = manager
//!     .configure_listener(
//!         &Entity::new()
//!             .with("port", "5672")
//!             .with("role", "normal")
//!             .with("maxFrameSize", 16384)
//!             .with("maxSessions", 100)
//!             .with("idleTimeoutSeconds", 16),
//!     )
//!     .unwrap();
//! assert_eq!(listener.config().host_port, "127.0.0.1:5672");
//!
//! let controller = LifecycleController::new(manager, Arc::new(LoopbackTransport));
//! let report = controller.start().unwrap();
//! assert_eq!(report.listeners_started, 1);
//! ```

mod config;
pub mod consts;
mod endpoint;
mod error;
mod failover;
mod lifecycle;
mod manager;
mod password;
mod profile;
mod resolver;
mod server_config;
mod transport;
mod types;
mod worker;

pub use config::{ManagerConfig, PlatformWidth};
pub use endpoint::{Connector, Listener};
pub use error::{ManagerError, Result, TransportError};
pub use failover::{FailoverEntry, FailoverError, FailoverList};
pub use lifecycle::{LifecycleController, StartReport};
pub use manager::ConnectionManager;
pub use password::{PasswordSource, read_password_file, resolve_password};
pub use profile::{SslCredentials, SslProfile, SslProfileRegistry};
pub use resolver::{
    ConfigResolver, IncomingCapacity, clamp_max_frame_size, clamp_max_sessions, incoming_capacity,
    select_host,
};
pub use server_config::{ServerConfig, StripAnnotations};
pub use transport::{BoundListener, Transport, TransportConnection};
pub use types::{ConnectionId, EndpointId, EndpointState, LogComponents, ProfileId, Role};
pub use worker::{ConnectionHandle, ConnectionWorker, ControlMessage};
