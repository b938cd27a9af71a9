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

//! Error types for connection management

use crate::failover::FailoverError;
use crate::types::{EndpointId, ProfileId};
use switchyard_entity::EntityError;
use thiserror::Error;

/// Result type for connection management operations
pub type Result<T> = std::result::Result<T, ManagerError>;

/// Errors reported by the transport collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// A listen request was refused
    #[error("Unable to listen on {host_port}: {reason}")]
    Bind {
        /// Address the listener was configured for
        host_port: String,
        /// Transport supplied reason
        reason: String,
    },

    /// Any other transport failure
    #[error("{0}")]
    Other(String),
}

/// Connection manager error types
#[derive(Debug, Error)]
pub enum ManagerError {
    /// A required attribute is missing or has the wrong type
    #[error("Invalid configuration: {0}")]
    Entity(#[from] EntityError),

    /// An attribute is present but its value is unacceptable
    #[error("Attribute '{name}' is invalid: {reason}")]
    InvalidAttribute {
        /// Attribute name
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The `role` attribute names no known role
    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    /// The `failoverList` attribute could not be parsed
    #[error("Bad failover list: {0}")]
    FailoverList(#[from] FailoverError),

    /// A referenced resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// No listener or connector with the given identity is registered
    #[error("Endpoint {0} not found")]
    EndpointNotFound(EndpointId),

    /// No SSL profile with the given identity is registered
    #[error("SSL profile {0} not found")]
    ProfileNotFound(ProfileId),

    /// A listener could not bind during the first start pass
    #[error("Listen on {host_port} failed during initial config: {source}")]
    InitialBindFailed {
        /// Address the listener was configured for
        host_port: String,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },
}

impl ManagerError {
    /// Build a [`ManagerError::InvalidAttribute`]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ManagerError::InvalidAttribute {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error was caused by bad administrative input
    ///
    /// Validation errors abort the create operation that raised them.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ManagerError::Entity(_)
                | ManagerError::InvalidAttribute { .. }
                | ManagerError::UnknownRole(_)
                | ManagerError::FailoverList(_)
        )
    }

    /// Check if the error must terminate the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, ManagerError::InitialBindFailed { .. })
    }

    /// Check if the error is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ManagerError::NotFound(_)
                | ManagerError::EndpointNotFound(_)
                | ManagerError::ProfileNotFound(_)
        )
    }
}
