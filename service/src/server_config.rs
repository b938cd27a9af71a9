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

//! Resolved endpoint configuration

use crate::failover::FailoverList;
use crate::profile::SslCredentials;
use crate::types::{LogComponents, Role};
use std::fmt;

/// Which routing annotations are stripped from messages crossing an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripAnnotations {
    /// Strip inbound and outbound
    #[default]
    Both,
    /// Strip inbound only
    In,
    /// Strip outbound only
    Out,
    /// Strip nothing
    No,
}

impl StripAnnotations {
    /// Parse a `stripAnnotations` attribute; absent or unknown values mean `Both`
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("in") => StripAnnotations::In,
            Some("out") => StripAnnotations::Out,
            Some("no") => StripAnnotations::No,
            _ => StripAnnotations::Both,
        }
    }

    /// Whether inbound annotations are stripped
    pub fn inbound(self) -> bool {
        matches!(self, StripAnnotations::Both | StripAnnotations::In)
    }

    /// Whether outbound annotations are stripped
    pub fn outbound(self) -> bool {
        matches!(self, StripAnnotations::Both | StripAnnotations::Out)
    }
}

/// Fully validated and defaulted configuration of one listener or connector
///
/// Produced by [`ConfigResolver`](crate::ConfigResolver) and shared read-only
/// behind an `Arc` once attached to an endpoint. SSL fields are copies taken
/// from the named profile at resolution time.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Administrative name
    pub name: Option<String>,
    /// Host name or address
    pub host: String,
    /// Port number or service name
    pub port: String,
    /// `"<host>:<port>"`
    pub host_port: String,
    /// Role of connections made through this endpoint
    pub role: Role,
    /// Inter-router link cost
    pub cost: i64,
    /// Restrict to one address family (`IPv4`/`IPv6`)
    pub protocol_family: Option<String>,
    /// Accept HTTP/websocket connections
    pub http: bool,
    /// Directory served over HTTP
    pub http_root: Option<String>,
    /// Largest frame accepted, never below the protocol minimum
    pub max_frame_size: u32,
    /// Session limit in `[1, 32768]`
    pub max_sessions: u32,
    /// Idle timeout in seconds
    pub idle_timeout_seconds: u32,
    /// Per-link credit
    pub link_capacity: u32,
    /// Session incoming window in bytes
    pub incoming_capacity: u64,
    /// Peers must authenticate
    pub require_authentication: bool,
    /// Connections must be encrypted
    pub require_encryption: bool,
    /// TLS is mandatory (only meaningful with an SSL profile)
    pub ssl_required: bool,
    /// Peers must present a certificate (SASL EXTERNAL configured)
    pub ssl_require_peer_authentication: bool,
    /// Verify the peer host name against its certificate
    pub verify_host_name: bool,
    /// Permit authentication over unencrypted connections
    pub allow_insecure_authentication: bool,
    /// Strip routing annotations from inbound messages
    pub strip_inbound_annotations: bool,
    /// Strip routing annotations from outbound messages
    pub strip_outbound_annotations: bool,
    /// Scope addresses per virtual host
    pub multi_tenant: bool,
    /// SASL user name for outbound authentication
    pub sasl_username: Option<String>,
    /// SASL password for outbound authentication
    pub sasl_password: Option<String>,
    /// Space separated SASL mechanism list
    pub sasl_mechanisms: Option<String>,
    /// Name of the referenced SSL profile
    pub ssl_profile: Option<String>,
    /// Credentials copied from the SSL profile, empty if it was not found
    pub ssl: SslCredentials,
    /// Alternate addresses advertised to clients
    pub failover_list: Option<FailoverList>,
    /// Raw `logMessage` attribute
    pub log_message: Option<String>,
    /// Parsed message log components
    pub log_components: LogComponents,
}

impl ServerConfig {
    /// One line description used when the endpoint is configured
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} proto={}, role={}",
            self.host_port,
            self.protocol_family.as_deref().unwrap_or("any"),
            self.role
        );
        if self.http {
            summary.push_str(", http");
        }
        if let Some(profile) = &self.ssl_profile {
            summary.push_str(", sslProfile=");
            summary.push_str(profile);
        }
        summary
    }

    /// Whether the named message property is written to the message log
    pub fn is_log_component_enabled(&self, component: &str) -> bool {
        self.log_components.is_enabled(component)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("name", &self.name)
            .field("host_port", &self.host_port)
            .field("role", &self.role)
            .field("max_frame_size", &self.max_frame_size)
            .field("max_sessions", &self.max_sessions)
            .field("incoming_capacity", &self.incoming_capacity)
            .field("link_capacity", &self.link_capacity)
            .field("sasl_username", &self.sasl_username)
            .field("sasl_password", &self.sasl_password.as_ref().map(|_| "<redacted>"))
            .field("ssl_profile", &self.ssl_profile)
            .field("ssl", &self.ssl)
            .finish_non_exhaustive()
    }
}
