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

use crate::{AttributeValue, EntityError, EntityResult};
use std::collections::BTreeMap;

/// An attribute set describing one administrative entity
///
/// Lookups come in two flavours: `get_*` for required attributes, which fail
/// with [`EntityError::MissingAttribute`], and `opt_*` for optional ones, which
/// fall back to a caller-supplied default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    attributes: BTreeMap<String, AttributeValue>,
}

impl Entity {
    /// Create an empty entity
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, returning the entity for chaining
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an attribute in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its previous value
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(name)
    }

    /// Raw access to an attribute
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Check whether an attribute is present
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the entity has no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over attributes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a required string attribute
    pub fn get_string(&self, name: &str) -> EntityResult<String> {
        self.get(name)
            .map(AttributeValue::as_string)
            .ok_or_else(|| missing(name))
    }

    /// Read an optional string attribute
    pub fn opt_string(&self, name: &str, default: Option<&str>) -> EntityResult<Option<String>> {
        Ok(self
            .get(name)
            .map(AttributeValue::as_string)
            .or_else(|| default.map(str::to_string)))
    }

    /// Read a required integer attribute
    pub fn get_long(&self, name: &str) -> EntityResult<i64> {
        let value = self.get(name).ok_or_else(|| missing(name))?;
        value
            .as_long()
            .ok_or_else(|| wrong_type(name, value, "integer"))
    }

    /// Read an optional integer attribute
    pub fn opt_long(&self, name: &str, default: i64) -> EntityResult<i64> {
        match self.get(name) {
            Some(value) => value
                .as_long()
                .ok_or_else(|| wrong_type(name, value, "integer")),
            None => Ok(default),
        }
    }

    /// Read an optional boolean attribute
    pub fn opt_bool(&self, name: &str, default: bool) -> EntityResult<bool> {
        match self.get(name) {
            Some(value) => value
                .as_bool()
                .ok_or_else(|| wrong_type(name, value, "boolean")),
            None => Ok(default),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Entity
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn missing(name: &str) -> EntityError {
    EntityError::MissingAttribute {
        name: name.to_string(),
    }
}

fn wrong_type(name: &str, value: &AttributeValue, expected: &'static str) -> EntityError {
    EntityError::WrongType {
        name: name.to_string(),
        value: value.as_string(),
        expected,
    }
}
