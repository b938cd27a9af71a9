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

//! Core identifier, state and flag types

use std::fmt;
use std::str::FromStr;

/// Identity of a listener or connector (monotonically increasing, never reused)
///
/// Identities double as the registry's ordering key, so iterating endpoints by
/// ascending identity yields insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(u64);

impl EndpointId {
    /// Create a new endpoint ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "endpoint-{}", self.0)
    }
}

/// Identity stamped on an SSL profile at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileId(u64);

impl ProfileId {
    /// Create a new profile ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ssl-profile-{}", self.0)
    }
}

/// Identity of a live transport connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Create a new connection ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Endpoint lifecycle state (stored as atomic u8 for lock-free reads from I/O contexts)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EndpointState {
    /// Configuration applied, nothing requested from the transport yet
    Configured = 0,
    /// Bind or connect has been requested
    Starting = 1,
    /// Bound (listener) or connected (connector)
    Active = 2,
    /// Administrative deletion in progress
    Closing = 3,
    /// Detached from the registry
    Closed = 4,
}

impl EndpointState {
    /// Convert from u8 (for atomic operations)
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Configured,
            1 => Self::Starting,
            2 => Self::Active,
            3 => Self::Closing,
            _ => Self::Closed,
        }
    }

    /// Convert to u8 (for atomic operations)
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if the endpoint is being or has been torn down
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closing | Self::Closed)
    }
}

impl fmt::Display for EndpointState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => write!(f, "configured"),
            Self::Starting => write!(f, "starting"),
            Self::Active => write!(f, "active"),
            Self::Closing => write!(f, "closing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Role an endpoint plays in the router network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Ordinary client connections
    Normal,
    /// Links to peer routers
    InterRouter,
    /// Brokers and other containers that own link routes
    RouteContainer,
    /// Edge router uplinks
    Edge,
}

impl Role {
    /// Configuration spelling of the role
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Normal => "normal",
            Role::InterRouter => "inter-router",
            Role::RouteContainer => "route-container",
            Role::Edge => "edge",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Role::Normal),
            "inter-router" => Ok(Role::InterRouter),
            "route-container" => Ok(Role::RouteContainer),
            "edge" => Ok(Role::Edge),
            other => Err(other.to_string()),
        }
    }
}

/// Message properties that may be written to the message log
///
/// Bit `i` corresponds to `LogComponents::NAMES[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LogComponents(u32);

impl LogComponents {
    /// Recognized component names, in bit order
    pub const NAMES: [&'static str; 14] = [
        "message-id",
        "user-id",
        "to",
        "subject",
        "reply-to",
        "correlation-id",
        "content-type",
        "content-encoding",
        "absolute-expiry-time",
        "creation-time",
        "group-id",
        "group-sequence",
        "reply-to-group-id",
        "app-properties",
    ];

    /// No component logged
    pub const NONE: LogComponents = LogComponents(0);

    /// Every recognized component logged
    pub const ALL: LogComponents = LogComponents((1 << Self::NAMES.len()) - 1);

    /// Build from raw bits, discarding bits that name no component
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bit mask
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Parse a `logMessage` attribute
    ///
    /// `all` enables everything, `none` or an absent value enables nothing, and
    /// otherwise each comma separated token that exactly matches a component
    /// name sets that component's bit. Unknown tokens are ignored.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("none") => Self::NONE,
            Some("all") => Self::ALL,
            Some(list) => list
                .split(',')
                .filter_map(Self::index_of)
                .fold(Self::NONE, |acc, i| Self(acc.0 | (1 << i))),
        }
    }

    /// Check whether the named component is enabled
    ///
    /// Unknown names are never enabled.
    pub fn is_enabled(self, component: &str) -> bool {
        Self::index_of(component).is_some_and(|i| (self.0 >> i) & 1 == 1)
    }

    /// Check if no component is enabled
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Names of the enabled components, in bit order
    pub fn enabled(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .iter()
            .enumerate()
            .filter(move |(i, _)| (self.0 >> i) & 1 == 1)
            .map(|(_, name)| *name)
    }

    fn index_of(name: &str) -> Option<usize> {
        Self::NAMES.iter().position(|c| *c == name)
    }
}
