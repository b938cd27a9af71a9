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

//! Interfaces to the network transport
//!
//! The transport performs the actual listen, accept and connect work. This
//! crate only asks it to start; results arrive later through the endpoint
//! objects (for example [`Connector::attach_connection`]). None of these calls
//! may block on network I/O.

use crate::endpoint::{Connector, Listener};
use crate::error::TransportError;
use crate::types::ConnectionId;
use std::sync::Arc;

/// The network transport driving listeners and connectors
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use switchyard_service::{BoundListener, Connector, Listener, Transport, TransportError};
///
/// struct NullListener;
///
/// impl BoundListener for NullListener {
///     fn close(&self) {}
/// }
///
/// struct NullTransport;
///
/// impl Transport for NullTransport {
///     fn listen(&self, _listener: &Arc<Listener>) -> Result<Box<dyn BoundListener>, TransportError> {
///         Ok(Box::new(NullListener))
///     }
///
///     fn connect(&self, _connector: &Arc<Connector>) {}
/// }
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Request that a listener start accepting connections
    ///
    /// Returns the transport's handle for the bound endpoint, or an error if
    /// the request is refused outright.
    fn listen(&self, listener: &Arc<Listener>) -> Result<Box<dyn BoundListener>, TransportError>;

    /// Request an outbound connection attempt
    ///
    /// Retry and backoff are the transport's concern. The transport may keep a
    /// clone of the connector for as long as it needs one.
    fn connect(&self, connector: &Arc<Connector>);
}

/// A listening endpoint owned by the transport
pub trait BoundListener: Send + Sync {
    /// Stop accepting connections
    fn close(&self);
}

/// A live connection owned by the transport
///
/// Only ever touched from the connection's own execution context, which is
/// where [`ConnectionWorker`](crate::ConnectionWorker) runs.
pub trait TransportConnection: Send + Sync {
    /// Identity of the connection
    fn id(&self) -> ConnectionId;

    /// Begin closing the connection
    fn close(&self);
}
