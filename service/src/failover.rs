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

//! Failover address lists advertised to clients of a listener

use crate::consts::{DEFAULT_FAILOVER_PORT, DEFAULT_FAILOVER_SCHEME};
use std::fmt;
use thiserror::Error;

/// Errors raised while parsing a failover list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailoverError {
    /// The list contains no entries
    #[error("failover list is empty")]
    Empty,

    /// An entry between two commas is blank
    #[error("entry {index} is empty")]
    EmptyEntry {
        /// Zero based position of the entry
        index: usize,
    },

    /// An entry has no host part
    #[error("entry '{entry}' has no host")]
    MissingHost {
        /// Offending entry text
        entry: String,
    },

    /// An entry has a malformed scheme or port
    #[error("entry '{entry}' is malformed")]
    Malformed {
        /// Offending entry text
        entry: String,
    },
}

/// One alternate address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailoverEntry {
    scheme: Option<String>,
    host: String,
    port: Option<String>,
}

impl FailoverEntry {
    /// Scheme, defaulting to `amqp`
    pub fn scheme(&self) -> &str {
        self.scheme.as_deref().unwrap_or(DEFAULT_FAILOVER_SCHEME)
    }

    /// Host name or address (IPv6 addresses keep their brackets)
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port, defaulting to `5672`
    pub fn port(&self) -> &str {
        self.port.as_deref().unwrap_or(DEFAULT_FAILOVER_PORT)
    }

    fn parse(entry: &str) -> Result<Self, FailoverError> {
        let malformed = || FailoverError::Malformed {
            entry: entry.to_string(),
        };

        let (scheme, rest) = match entry.split_once("://") {
            Some(("", _)) => return Err(malformed()),
            Some((scheme, rest)) => (Some(scheme.to_string()), rest),
            None => (None, entry),
        };

        let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            let end = bracketed.find(']').ok_or_else(malformed)?;
            let host = &rest[..end + 2];
            match &bracketed[end + 1..] {
                "" => (host, None),
                tail => (host, Some(tail.strip_prefix(':').ok_or_else(malformed)?)),
            }
        } else {
            match rest.rsplit_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (rest, None),
            }
        };

        if host.is_empty() || host == "[]" {
            return Err(FailoverError::MissingHost {
                entry: entry.to_string(),
            });
        }
        if port.is_some_and(|p| p.is_empty() || p.contains(':')) {
            return Err(malformed());
        }

        Ok(Self {
            scheme,
            host: host.to_string(),
            port: port.map(str::to_string),
        })
    }
}

impl fmt::Display for FailoverEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme(), self.host(), self.port())
    }
}

/// Ordered list of alternate addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailoverList {
    entries: Vec<FailoverEntry>,
}

impl FailoverList {
    /// Parse a comma separated list of `[scheme://]host[:port]` entries
    pub fn parse(text: &str) -> Result<Self, FailoverError> {
        if text.trim().is_empty() {
            return Err(FailoverError::Empty);
        }

        let entries = text
            .split(',')
            .map(str::trim)
            .enumerate()
            .map(|(index, entry)| {
                if entry.is_empty() {
                    Err(FailoverError::EmptyEntry { index })
                } else {
                    FailoverEntry::parse(entry)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// Entries in configured order
    pub fn entries(&self) -> &[FailoverEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a parsed list
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
