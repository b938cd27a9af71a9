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

//! Endpoint configuration resolution
//!
//! Turns the attribute set of a listener or connector into a [`ServerConfig`]:
//! required attributes are checked, defaults applied, numeric limits clamped
//! and SSL credentials copied out of the referenced profile. Resolution is all
//! or nothing; a failed attribute leaves nothing behind.

use crate::config::{ManagerConfig, PlatformWidth};
use crate::consts::{DEFAULT_HOST, MAX_SESSIONS_LIMIT, MIN_MAX_FRAME_SIZE};
use crate::profile::SslProfileRegistry;
use crate::server_config::{ServerConfig, StripAnnotations};
use crate::types::{LogComponents, Role};
use crate::{ManagerError, Result};
use switchyard_entity::Entity;
use tracing::warn;

/// Session incoming capacity derived from frame count and frame size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingCapacity {
    /// Capacity in bytes
    pub capacity: u64,
    /// Frame count actually honoured, when the requested one had to be truncated
    pub truncated_frames: Option<u64>,
}

/// Compute the session incoming capacity
///
/// With no frame count the capacity is effectively unlimited for the platform.
/// Otherwise it is `session_frames * max_frame_size`, clamped to the platform
/// size limit, and never below the protocol minimum frame size.
pub fn incoming_capacity(
    session_frames: u64,
    max_frame_size: u32,
    platform: PlatformWidth,
) -> IncomingCapacity {
    if session_frames == 0 {
        return IncomingCapacity {
            capacity: platform.unlimited_capacity(max_frame_size),
            truncated_frames: None,
        };
    }

    let frame_size = u64::from(max_frame_size.max(MIN_MAX_FRAME_SIZE));
    let limit = platform.size_limit();
    match session_frames.checked_mul(frame_size) {
        Some(trial) if trial < limit => IncomingCapacity {
            capacity: trial.max(u64::from(MIN_MAX_FRAME_SIZE)),
            truncated_frames: None,
        },
        _ => IncomingCapacity {
            capacity: limit,
            truncated_frames: Some(limit / frame_size),
        },
    }
}

/// Pick the endpoint host from the `host` and `addr` attributes
///
/// Both attributes carry the same default, so whichever one was changed to a
/// non-empty value wins, `host` first. If both are empty `host` is kept.
pub fn select_host(host: Option<String>, addr: Option<String>) -> Option<String> {
    match (host, addr) {
        (Some(host), Some(addr)) if host.is_empty() && addr.is_empty() => Some(host),
        (Some(host), _) if !host.is_empty() => Some(host),
        (_, Some(addr)) if !addr.is_empty() => Some(addr),
        _ => None,
    }
}

/// Clamp a configured session count into `[1, 32768]`, treating 0 as unset
pub fn clamp_max_sessions(value: i64) -> u32 {
    if value <= 0 || value > i64::from(MAX_SESSIONS_LIMIT) {
        MAX_SESSIONS_LIMIT
    } else {
        value as u32
    }
}

/// Promote a configured frame size to the protocol minimum
pub fn clamp_max_frame_size(value: i64) -> u32 {
    value.clamp(i64::from(MIN_MAX_FRAME_SIZE), i64::from(u32::MAX)) as u32
}

fn non_negative_u32(name: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        ManagerError::invalid(name, format!("{} is outside 0..={}", value, u32::MAX))
    })
}

fn non_negative_u64(name: &str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| ManagerError::invalid(name, format!("{} must not be negative", value)))
}

/// Resolves endpoint attribute sets against the SSL profile registry
pub struct ConfigResolver<'a> {
    config: &'a ManagerConfig,
    profiles: &'a SslProfileRegistry,
}

impl<'a> ConfigResolver<'a> {
    /// Create a resolver
    pub fn new(config: &'a ManagerConfig, profiles: &'a SslProfileRegistry) -> Self {
        Self { config, profiles }
    }

    /// Resolve an endpoint attribute set
    ///
    /// A referenced SSL profile that does not exist is not an error here; the
    /// configuration simply carries no credentials and TLS setup fails later
    /// in the transport.
    pub fn resolve(&self, entity: &Entity) -> Result<ServerConfig> {
        let authenticate_peer = entity.opt_bool("authenticatePeer", false)?;
        let verify_host_name = entity.opt_bool("verifyHostName", true)?;
        let require_encryption = entity.opt_bool("requireEncryption", false)?;
        let require_ssl = entity.opt_bool("requireSsl", false)?;
        let require_peer_auth = entity.opt_bool("requirePeerAuth", false)?;
        let allow_unsecured = entity.opt_bool("allowUnsecured", !require_ssl)?;

        let log_message = entity.opt_string("logMessage", None)?;
        let log_components = LogComponents::parse(log_message.as_deref());
        let port = entity.get_string("port")?;
        let name = entity.opt_string("name", None)?;
        let role = entity
            .get_string("role")?
            .parse::<Role>()
            .map_err(ManagerError::UnknownRole)?;
        let cost = entity.opt_long("cost", 1)?;
        let protocol_family = entity.opt_string("protocolFamily", None)?;
        let http_root = entity.opt_string("httpRoot", None)?;
        let http = entity.opt_bool("http", false)? || http_root.is_some();
        let max_frame_size = clamp_max_frame_size(entity.get_long("maxFrameSize")?);
        let max_sessions = clamp_max_sessions(entity.get_long("maxSessions")?);
        let session_frames = non_negative_u64(
            "maxSessionFrames",
            entity.opt_long("maxSessionFrames", 0)?,
        )?;
        let idle_timeout_seconds =
            non_negative_u32("idleTimeoutSeconds", entity.get_long("idleTimeoutSeconds")?)?;
        let sasl_username = entity.opt_string("saslUsername", None)?;
        let sasl_password = entity.opt_string("saslPassword", None)?;
        let sasl_mechanisms = entity.opt_string("saslMechanisms", None)?;
        let ssl_profile = entity.opt_string("sslProfile", None)?;
        let link_capacity =
            match non_negative_u32("linkCapacity", entity.opt_long("linkCapacity", 0)?)? {
                0 => self.config.default_link_capacity,
                capacity => capacity,
            };
        let multi_tenant = entity.opt_bool("multiTenant", false)?;
        let strip_annotations = entity.opt_string("stripAnnotations", None)?;
        let strip = StripAnnotations::parse(strip_annotations.as_deref());

        let host = select_host(
            entity.opt_string("host", Some(DEFAULT_HOST))?,
            entity.opt_string("addr", Some(DEFAULT_HOST))?,
        )
        .ok_or_else(|| ManagerError::invalid("host", "neither host nor addr is set"))?;
        let host_port = format!("{}:{}", host, port);

        let incoming = incoming_capacity(session_frames, max_frame_size, self.config.platform);
        if let Some(truncated) = incoming.truncated_frames {
            warn!(
                entity_name = name.as_deref().unwrap_or(""),
                host = %host,
                port = %port,
                "Server configuration for I/O adapter entity name:'{}', host:'{}', port:'{}', \
                 requested maxSessionFrames truncated from {} to {}",
                name.as_deref().unwrap_or(""),
                host,
                port,
                session_frames,
                truncated
            );
        }

        let (ssl_required, ssl_require_peer_authentication, ssl) = match ssl_profile.as_deref() {
            Some(profile_name) => (
                require_ssl || !allow_unsecured,
                sasl_mechanisms
                    .as_deref()
                    .is_some_and(|mechs| mechs.contains("EXTERNAL")),
                self.profiles
                    .find(profile_name)
                    .map(|profile| profile.credentials().clone())
                    .unwrap_or_default(),
            ),
            None => (false, false, Default::default()),
        };

        Ok(ServerConfig {
            name,
            host,
            port,
            host_port,
            role,
            cost,
            protocol_family,
            http,
            http_root,
            max_frame_size,
            max_sessions,
            idle_timeout_seconds,
            link_capacity,
            incoming_capacity: incoming.capacity,
            require_authentication: authenticate_peer || require_peer_auth,
            require_encryption: require_encryption || !allow_unsecured,
            ssl_required,
            ssl_require_peer_authentication,
            verify_host_name,
            allow_insecure_authentication: true,
            strip_inbound_annotations: strip.inbound(),
            strip_outbound_annotations: strip.outbound(),
            multi_tenant,
            sasl_username,
            sasl_password,
            sasl_mechanisms,
            ssl_profile,
            ssl,
            failover_list: None,
            log_message,
            log_components,
        })
    }
}
