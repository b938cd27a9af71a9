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

//! Error types for attribute lookups

/// Result type for attribute lookups
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors raised while extracting a typed attribute from an [`Entity`](crate::Entity)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    /// A required attribute was not supplied
    #[error("Required attribute '{name}' is missing")]
    MissingAttribute {
        /// Attribute name
        name: String,
    },

    /// The attribute exists but cannot be read as the requested type
    #[error("Attribute '{name}' has value '{value}' which is not a valid {expected}")]
    WrongType {
        /// Attribute name
        name: String,
        /// Rendered value that failed conversion
        value: String,
        /// Name of the requested type
        expected: &'static str,
    },
}

impl EntityError {
    /// Name of the attribute this error refers to
    pub fn attribute(&self) -> &str {
        match self {
            EntityError::MissingAttribute { name } => name,
            EntityError::WrongType { name, .. } => name,
        }
    }
}
